//! Contracts for the external services one batch run talks to
//!
//! The materials lookup service, the workflow builder, and the job store are
//! collaborators, not part of this layer: each is a trait with one real
//! implementation and a fixture implementation for offline runs and tests.

/// File-backed collaborators for offline runs
pub mod fixture;
/// Workflow construction from a structure and a configuration
pub mod graph;
/// Formula expansion and structure retrieval
pub mod lookup;
/// Job graph submission and failure reporting
pub mod store;
