//! Presentation preferences kept beside, not inside, the catalog snapshot.
//!
//! # Invariants
//! - The theme slot is independent of the snapshot slot; clearing one never
//!   touches the other.
//! - Unrecognized stored values read as "unset".

use super::kv::{read_slot, write_slot};
use crate::db::DbResult;
use log::warn;
use rusqlite::Connection;
use std::str::FromStr;

/// Storage key holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "student-registration-theme";

/// Color scheme chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unsupported theme `{other}`; expected light|dark")),
        }
    }
}

/// Picks the effective theme: stored choice, then system preference, then light.
pub fn resolve_theme(stored: Option<Theme>, system_prefers_dark: Option<bool>) -> Theme {
    match (stored, system_prefers_dark) {
        (Some(theme), _) => theme,
        (None, Some(true)) => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Theme slot bound to one connection.
pub struct ThemePreference<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> ThemePreference<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, THEME_STORAGE_KEY)
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Returns the stored theme, or `None` when unset or unrecognized.
    pub fn load(&self) -> DbResult<Option<Theme>> {
        let Some(raw) = read_slot(self.conn, &self.key)? else {
            return Ok(None);
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Ok(Some(theme)),
            Err(err) => {
                warn!("event=theme_load module=preferences status=ignored error={err}");
                Ok(None)
            }
        }
    }

    pub fn save(&self, theme: Theme) -> DbResult<()> {
        write_slot(self.conn, &self.key, theme.as_str())
    }

    /// Flips the effective theme and persists the result.
    pub fn toggle(&self, system_prefers_dark: Option<bool>) -> DbResult<Theme> {
        let next = resolve_theme(self.load()?, system_prefers_dark).toggled();
        self.save(next)?;
        Ok(next)
    }
}
