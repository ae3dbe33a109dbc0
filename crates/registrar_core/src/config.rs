//! Runtime configuration for locating the store.
//!
//! # Invariants
//! - Resolution never fails; missing or blank env values fall back to defaults.

use crate::storage::preferences::THEME_STORAGE_KEY;
use crate::storage::SNAPSHOT_STORAGE_KEY;
use std::path::{Path, PathBuf};

/// Env var overriding the database file location.
pub const DB_PATH_ENV: &str = "REGISTRAR_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "registrar.sqlite3";

/// Where and under which keys the catalog is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub snapshot_key: String,
    pub theme_key: String,
}

impl StoreConfig {
    /// Uses default keys with an explicit database path.
    pub fn with_db_path(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            snapshot_key: SNAPSHOT_STORAGE_KEY.to_string(),
            theme_key: THEME_STORAGE_KEY.to_string(),
        }
    }

    /// Reads `REGISTRAR_DB_PATH`, falling back to a file in the temp dir.
    pub fn from_env() -> Self {
        Self::with_db_path(resolve_db_path(std::env::var(DB_PATH_ENV).ok()))
    }
}

fn resolve_db_path(raw: Option<String>) -> PathBuf {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{resolve_db_path, StoreConfig, DEFAULT_DB_FILE_NAME};
    use std::path::PathBuf;

    #[test]
    fn blank_override_falls_back_to_temp_dir() {
        let expected = std::env::temp_dir().join(DEFAULT_DB_FILE_NAME);
        assert_eq!(resolve_db_path(None), expected);
        assert_eq!(resolve_db_path(Some("   ".to_string())), expected);
    }

    #[test]
    fn override_is_trimmed() {
        assert_eq!(
            resolve_db_path(Some(" /data/catalog.db ".to_string())),
            PathBuf::from("/data/catalog.db")
        );
    }

    #[test]
    fn explicit_path_uses_default_keys() {
        let config = StoreConfig::with_db_path("/tmp/x.db");
        assert_eq!(config.snapshot_key, "student-registration-system");
        assert_eq!(config.theme_key, "student-registration-theme");
    }
}
