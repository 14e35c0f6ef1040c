//! Cap-enforced batch submission to the job store
//!
//! Selectors are processed strictly in order, one submission at a time: the
//! store is a shared rate-sensitive resource and the cap check runs against
//! a single counter, so nothing here is concurrent.

/// The submission loop and cap enforcement
pub mod batch;
/// Batch outcomes and submission errors
pub mod outcome;
