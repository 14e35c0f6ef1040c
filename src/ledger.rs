//! Range-indexed provenance for acknowledged submissions
//!
//! One record per job the store acknowledged, in submission order. The
//! ledger is owned by one run; the caller persists it (see `db`) if
//! reconciliation is needed after the process exits.

/// Ledger records and the derived tabular view
pub mod record;
/// Render the provenance table for external inspection
pub mod report;
