//! Core domain logic for the course registration catalog.
//! This crate is the single source of truth for referential integrity.

pub mod config;
pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use id::generate_id;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{Course, CourseType};
pub use model::offering::CourseOffering;
pub use model::registration::StudentRegistration;
pub use model::snapshot::{DanglingReference, Snapshot};
pub use model::EntityId;
pub use service::catalog_service::CatalogService;
pub use service::validation::{CatalogError, CatalogResult, EntityKind};
pub use storage::memory::MemorySnapshotBackend;
pub use storage::preferences::{resolve_theme, Theme, ThemePreference};
pub use storage::sqlite::SqliteSnapshotBackend;
pub use storage::{LoadOutcome, SaveOutcome, SnapshotBackend, StorageError};
pub use store::queries::DeletionImpact;
pub use store::registration_store::{CascadeReport, Commit, RegistrationStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
