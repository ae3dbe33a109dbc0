//! Domain model for the course registration catalog.
//!
//! # Responsibility
//! - Define the four persisted entity kinds and the snapshot that groups them.
//! - Own the wire shape (camelCase field names) of the persisted snapshot.
//!
//! # Invariants
//! - Every entity is identified by an opaque, immutable `EntityId`.
//! - Creation timestamps are ISO-8601 UTC strings and never change.
//! - Deletion is immediate; there are no tombstones.

pub mod catalog;
pub mod offering;
pub mod registration;
pub mod snapshot;

use chrono::{SecondsFormat, Utc};

/// Opaque relational key shared by every entity kind.
///
/// Kept as a plain string because persisted data may carry ids produced by
/// other generators; only equality matters.
pub type EntityId = String;

/// Returns the current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::timestamp_now;

    #[test]
    fn timestamp_uses_millis_and_zulu_suffix() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with('Z'), "unexpected stamp: {stamp}");
        assert_eq!(stamp.len(), "2026-01-01T00:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
