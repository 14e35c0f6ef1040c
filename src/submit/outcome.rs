use thiserror::Error;

use crate::collab::graph::GraphError;
use crate::collab::lookup::{LookupError, MaterialId};
use crate::collab::store::StoreError;
use crate::ledger::record::ProvenanceLedger;
use crate::range::RangeError;
use crate::request::message::EntitySelector;

/// Why one submission failed
///
/// An empty allocation from the store is a submission failure, not a
/// degenerate success; it surfaces through the [RangeError] variant.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("job store rejected {material_id}: {source}")]
    Rejected {
        material_id: MaterialId,
        source: StoreError,
    },
    #[error(transparent)]
    Allocation(#[from] RangeError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// How a batch run ended
///
/// Hitting the cap is a routine, expected condition and is reported here
/// rather than as an error. In both non-complete cases the work already
/// admitted is not rolled back: jobs committed to the store are irreversible
/// at this layer.
#[derive(Debug)]
pub enum AdmissionOutcome {
    /// Every selector was processed
    Complete { admitted: usize },
    /// Admitting the flagged selector's expansion would have exceeded the
    /// cap; nothing from that expansion was submitted
    CapExceeded {
        selector_index: usize,
        selector: EntitySelector,
        would_admit: usize,
        cap: usize,
    },
    /// A collaborator failure stopped the batch partway
    Aborted {
        selector_index: usize,
        material_id: Option<MaterialId>,
        error: SubmitError,
    },
}

impl AdmissionOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, AdmissionOutcome::Complete { .. })
    }
}

/// The ledger accumulated so far plus how the run ended; every record in the
/// ledger corresponds to a store-acknowledged submission
#[derive(Debug)]
pub struct BatchResult {
    pub ledger: ProvenanceLedger,
    pub outcome: AdmissionOutcome,
}
