//! Key-value slots on top of the `kv_store` table.
//!
//! Each slot is one text value under one key, overwritten as a whole.

use crate::db::DbResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Reads the value stored under `key`, if any.
pub fn read_slot(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

/// Stores `value` under `key`, replacing any previous value.
pub fn write_slot(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )?;
    Ok(())
}
