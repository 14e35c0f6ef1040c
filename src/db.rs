//! Caller-side persistence of the provenance ledger in SQLite
//!
//! A submission run owns its ledger in memory; the database is how the CLI
//! keeps it across process exits so failed sub-task ids can be reconciled
//! later. Ranges are stored in their `"<low>-<high>"` string form.

/// Load a persisted ledger back into memory
pub mod load;
/// Connect to the ledger database
pub mod open;
/// Persist one run's ledger
pub mod save;
