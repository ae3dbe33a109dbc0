//! Domain store and its read-side helpers.
//!
//! # Responsibility
//! - Hold the catalog snapshot and apply cascading mutations.
//! - Resolve foreign keys for display and deletion previews.
//!
//! # Invariants
//! - Every mutation persists through a `SnapshotBackend` before returning.

pub mod queries;
pub mod registration_store;
