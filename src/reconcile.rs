//! Map failed sub-task ids back to the materials that produced them
//!
//! A linear scan per failed id is fine here: batch sizes are bounded by the
//! admission cap, so no index structure is kept.

use std::collections::BTreeMap;

use log::warn;
use thiserror::Error;

use crate::collab::lookup::MaterialId;
use crate::ledger::record::{LedgerRecord, ProvenanceLedger};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Overlapping ranges mean the store's allocation invariant is broken;
    /// this must propagate rather than silently picking an owner
    #[error("task {task_id} falls in the ranges of both {first} and {second}")]
    AmbiguousRange {
        task_id: u64,
        first: MaterialId,
        second: MaterialId,
    },
}

/// The result of one reconciliation pass
///
/// Ids no recorded range contains are not fatal: they are collected in
/// `unmatched` and the caller decides what to do about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub matched: BTreeMap<u64, MaterialId>,
    pub unmatched: Vec<u64>,
}

pub fn reconcile(
    ledger: &ProvenanceLedger,
    failed_ids: &[u64],
) -> Result<Reconciliation, ReconcileError> {
    let mut matched = BTreeMap::new();
    let mut unmatched = Vec::new();

    for &task_id in failed_ids {
        let mut owner: Option<&LedgerRecord> = None;
        for record in ledger.records() {
            if !record.range.contains(task_id) {
                continue;
            }
            if let Some(first) = owner {
                return Err(ReconcileError::AmbiguousRange {
                    task_id,
                    first: first.material_id.clone(),
                    second: record.material_id.clone(),
                });
            }
            owner = Some(record);
        }
        match owner {
            Some(record) => {
                matched.insert(task_id, record.material_id.clone());
            }
            None => {
                warn!("failed task {task_id} does not fall in any recorded range");
                unmatched.push(task_id);
            }
        }
    }

    Ok(Reconciliation { matched, unmatched })
}
