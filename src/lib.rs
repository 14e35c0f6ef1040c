//! Batch submission of materials workflows to a shared job store.
//!
//! The job store is a rate-sensitive shared resource, so every batch runs
//! under an admission cap. Each acknowledged submission is recorded in a
//! provenance ledger as a contiguous range of allocated sub-task ids, and
//! failed sub-task ids reported by the store can later be mapped back to the
//! material that produced them by range containment.

use std::path::PathBuf;

pub mod collab;
pub mod db;
pub mod kind;
pub mod ledger;
pub mod policy;
pub mod range;
pub mod reconcile;
pub mod request;
pub mod submit;

/// Directory holding the ledger database and rendered reports
pub struct WorkingDirectory {
    pub path: PathBuf,
}
