//! In-memory snapshot slot for tests and ephemeral sessions.

use super::{
    encode_snapshot, outcome_from_slot, LoadOutcome, SaveOutcome, SnapshotBackend, StorageError,
};
use crate::model::snapshot::Snapshot;

/// Holds the serialized snapshot as raw text, like a browser storage slot.
#[derive(Debug, Default)]
pub struct MemorySnapshotBackend {
    raw: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySnapshotBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with arbitrary text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Makes subsequent writes fail as if the slot were out of quota.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Current slot contents.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl SnapshotBackend for MemorySnapshotBackend {
    fn load(&self) -> LoadOutcome {
        outcome_from_slot(Ok(self.raw.clone()))
    }

    fn save(&mut self, snapshot: &Snapshot) -> SaveOutcome {
        if self.fail_writes {
            return SaveOutcome::WriteFailed(StorageError::Unavailable(
                "quota exceeded".to_string(),
            ));
        }
        match encode_snapshot(snapshot) {
            Ok(payload) => {
                self.raw = Some(payload);
                self.writes += 1;
                SaveOutcome::Saved
            }
            Err(err) => SaveOutcome::WriteFailed(err),
        }
    }
}
