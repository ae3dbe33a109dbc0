//! SQLite-backed snapshot slot.
//!
//! # Invariants
//! - The connection must have migrations applied (`try_new` checks this).
//! - The whole snapshot is written in one statement under one key.

use super::kv::{read_slot, write_slot};
use super::{
    encode_snapshot, outcome_from_slot, LoadOutcome, SaveOutcome, SnapshotBackend, StorageError,
    SNAPSHOT_STORAGE_KEY,
};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, DbResult};
use crate::model::snapshot::Snapshot;
use rusqlite::Connection;

/// Snapshot backend writing JSON into one `kv_store` row.
pub struct SqliteSnapshotBackend<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteSnapshotBackend<'conn> {
    /// Binds the backend to the default snapshot key.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        Self::with_key(conn, SNAPSHOT_STORAGE_KEY)
    }

    /// Binds the backend to a caller-chosen key.
    ///
    /// # Errors
    /// - `SchemaNotMigrated` when the connection is behind the latest schema.
    /// - `UnsupportedSchemaVersion` when it is ahead of what this binary knows.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> DbResult<Self> {
        let version = current_user_version(conn)?;
        let latest = latest_version();
        if version < latest {
            return Err(DbError::SchemaNotMigrated {
                db_version: version,
                expected: latest,
            });
        }
        if version > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            });
        }
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SnapshotBackend for SqliteSnapshotBackend<'_> {
    fn load(&self) -> LoadOutcome {
        outcome_from_slot(read_slot(self.conn, &self.key).map_err(StorageError::from))
    }

    fn save(&mut self, snapshot: &Snapshot) -> SaveOutcome {
        let written = encode_snapshot(snapshot).and_then(|payload| {
            write_slot(self.conn, &self.key, &payload).map_err(StorageError::from)
        });
        match written {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => SaveOutcome::WriteFailed(err),
        }
    }
}
