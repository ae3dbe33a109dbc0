//! Snapshot persistence backends.
//!
//! # Responsibility
//! - Define the `SnapshotBackend` contract used by the domain store.
//! - Encode/decode the snapshot wire format (JSON, camelCase).
//! - Report load/save results as explicit outcomes instead of errors.
//!
//! # Invariants
//! - `load` never fails: absent or malformed data yields the empty default.
//! - `save` never panics and never retries; failures are reported once.

use crate::db::DbError;
use crate::model::snapshot::Snapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod memory;
pub mod preferences;
pub mod sqlite;

/// Storage key holding the serialized catalog snapshot.
pub const SNAPSHOT_STORAGE_KEY: &str = "student-registration-system";

/// Failure reading or writing one storage slot.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying database failure.
    Db(DbError),
    /// Stored value is not a valid snapshot payload.
    Malformed(serde_json::Error),
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
    /// Slot refused the write (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Malformed(err) => write!(f, "malformed snapshot payload: {err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Malformed(err) | Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of reading the snapshot slot.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Slot held a valid snapshot.
    Loaded(Snapshot),
    /// Slot was empty; callers start from the default snapshot.
    Missing,
    /// Slot was unreadable or malformed; `snapshot` is the empty default.
    Recovered {
        snapshot: Snapshot,
        error: StorageError,
    },
}

impl LoadOutcome {
    /// Returns the usable snapshot carried by this outcome.
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            Self::Loaded(snapshot) | Self::Recovered { snapshot, .. } => snapshot,
            Self::Missing => Snapshot::default(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Missing => "missing",
            Self::Recovered { .. } => "recovered",
        }
    }
}

/// Result of writing the snapshot slot.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    /// Write did not land; the in-memory state stays authoritative.
    WriteFailed(StorageError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Durable slot holding exactly one snapshot.
pub trait SnapshotBackend {
    /// Reads the snapshot, substituting the default on any failure.
    fn load(&self) -> LoadOutcome;
    /// Replaces the stored snapshot with `snapshot`.
    fn save(&mut self, snapshot: &Snapshot) -> SaveOutcome;
}

impl<B: SnapshotBackend + ?Sized> SnapshotBackend for Box<B> {
    fn load(&self) -> LoadOutcome {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> SaveOutcome {
        (**self).save(snapshot)
    }
}

/// Serializes a snapshot into its persisted JSON form.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(StorageError::Encode)
}

/// Parses a persisted JSON payload into a snapshot.
pub fn decode_snapshot(raw: &str) -> Result<Snapshot, StorageError> {
    serde_json::from_str(raw).map_err(StorageError::Malformed)
}

/// Maps a raw slot read into a `LoadOutcome`.
pub(crate) fn outcome_from_slot(slot: Result<Option<String>, StorageError>) -> LoadOutcome {
    let raw = match slot {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadOutcome::Missing,
        Err(error) => {
            return LoadOutcome::Recovered {
                snapshot: Snapshot::default(),
                error,
            };
        }
    };

    match decode_snapshot(&raw) {
        Ok(snapshot) => LoadOutcome::Loaded(snapshot),
        Err(error) => LoadOutcome::Recovered {
            snapshot: Snapshot::default(),
            error,
        },
    }
}
