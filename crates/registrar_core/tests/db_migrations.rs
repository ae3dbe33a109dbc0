use registrar_core::db::migrations::latest_version;
use registrar_core::db::{open_db, open_db_in_memory, DbError};
use registrar_core::SqliteSnapshotBackend;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_kv_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn reopening_a_database_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registrar.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "kv_store");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn snapshot_backend_refuses_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSnapshotBackend::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        DbError::SchemaNotMigrated {
            db_version: 0,
            expected
        } if expected == latest_version()
    ));
    assert!(err.to_string().contains("behind expected"));
}

#[test]
fn snapshot_backend_refuses_newer_schema() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    let err = SqliteSnapshotBackend::try_new(&conn)
        .err()
        .expect("newer schema must be rejected");
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 999, .. }
    ));
    assert!(err.to_string().contains("newer than supported"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
