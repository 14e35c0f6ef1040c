use log::{info, warn};

use crate::collab::graph::GraphBuilder;
use crate::collab::lookup::{LookupError, MaterialId, MaterialsLookup};
use crate::collab::store::JobStore;
use crate::kind::JobKind;
use crate::ledger::record::{LedgerRecord, ProvenanceLedger};
use crate::policy::{ConfigPolicy, JobConfiguration};
use crate::range::TaskRange;
use crate::request::message::EntitySelector;
use crate::submit::outcome::{AdmissionOutcome, BatchResult, SubmitError};

/// Runs one batch under an admission cap
pub struct Submitter<'a> {
    lookup: &'a dyn MaterialsLookup,
    builder: &'a dyn GraphBuilder,
    store: &'a dyn JobStore,
    policy: ConfigPolicy,
    cap: usize,
}

impl<'a> Submitter<'a> {
    pub fn new(
        lookup: &'a dyn MaterialsLookup,
        builder: &'a dyn GraphBuilder,
        store: &'a dyn JobStore,
        policy: ConfigPolicy,
        cap: usize,
    ) -> Submitter<'a> {
        Submitter {
            lookup,
            builder,
            store,
            policy,
            cap,
        }
    }

    /// Process selectors in order, expanding each formula eagerly and
    /// checking the cap against the whole expansion before submitting any
    /// material from it. On a cap overflow or a collaborator failure the
    /// batch stops immediately; the ledger accumulated so far is returned
    /// and nothing is rolled back.
    pub fn submit_batch(
        &self,
        selectors: &[EntitySelector],
        kind: JobKind,
        base_config: &JobConfiguration,
    ) -> BatchResult {
        let mut ledger = ProvenanceLedger::new();
        let mut admitted = 0usize;

        for (selector_index, selector) in selectors.iter().enumerate() {
            let expansion = match self.expand(selector) {
                Ok(expansion) => expansion,
                Err(error) => {
                    return BatchResult {
                        ledger,
                        outcome: AdmissionOutcome::Aborted {
                            selector_index,
                            material_id: None,
                            error: error.into(),
                        },
                    }
                }
            };

            if expansion.is_empty() {
                info!("{selector} expands to no materials, skipping");
                continue;
            }

            if admitted + expansion.len() > self.cap {
                warn!(
                    "admission cap ({}) would be exceeded ({} admitted + {} from {}); \
                     wait for running workflows to finish and resume with {}",
                    self.cap,
                    admitted,
                    expansion.len(),
                    selector,
                    selector
                );
                return BatchResult {
                    ledger,
                    outcome: AdmissionOutcome::CapExceeded {
                        selector_index,
                        selector: selector.clone(),
                        would_admit: expansion.len(),
                        cap: self.cap,
                    },
                };
            }

            for material_id in expansion {
                match self.submit_one(&material_id, selector.formula(), kind, base_config) {
                    Ok(record) => {
                        ledger.push(record);
                        admitted += 1;
                    }
                    Err(error) => {
                        return BatchResult {
                            ledger,
                            outcome: AdmissionOutcome::Aborted {
                                selector_index,
                                material_id: Some(material_id),
                                error,
                            },
                        }
                    }
                }
            }
        }

        info!("batch complete: {admitted} submissions");
        BatchResult {
            ledger,
            outcome: AdmissionOutcome::Complete { admitted },
        }
    }

    /// Eager per-selector expansion; a direct material id is its own
    /// single-element expansion
    fn expand(&self, selector: &EntitySelector) -> Result<Vec<MaterialId>, LookupError> {
        match selector {
            EntitySelector::Material { material_id } => Ok(vec![material_id.clone()]),
            EntitySelector::Formula { formula } => self.lookup.expand(formula),
        }
    }

    /// One full submission: structure lookup, configuration selection,
    /// graph build, store submission. Only a store-acknowledged allocation
    /// produces a ledger record.
    fn submit_one(
        &self,
        material_id: &MaterialId,
        formula: Option<&str>,
        kind: JobKind,
        base_config: &JobConfiguration,
    ) -> Result<LedgerRecord, SubmitError> {
        let structure = self.lookup.fetch_structure(material_id)?;
        let config = self
            .policy
            .select_configuration(structure.num_sites, base_config);
        let graph = self.builder.build(kind, &structure, &config)?;
        let task_ids = self
            .store
            .submit(&graph)
            .map_err(|source| SubmitError::Rejected {
                material_id: material_id.clone(),
                source,
            })?;
        let range = TaskRange::encode(&task_ids)?;
        info!("submitted {material_id} ({kind}): tasks {range}");
        Ok(LedgerRecord::new(
            material_id.clone(),
            formula.map(str::to_string),
            kind,
            range,
        ))
    }
}
