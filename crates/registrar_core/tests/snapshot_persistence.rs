use registrar_core::db::{open_db, open_db_in_memory};
use registrar_core::storage::kv::{read_slot, write_slot};
use registrar_core::storage::preferences::THEME_STORAGE_KEY;
use registrar_core::storage::SNAPSHOT_STORAGE_KEY;
use registrar_core::{
    LoadOutcome, MemorySnapshotBackend, RegistrationStore, SaveOutcome, SnapshotBackend,
    SqliteSnapshotBackend, StorageError, Theme, ThemePreference,
};

#[test]
fn file_backed_store_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registrar.db");

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store = RegistrationStore::open(SqliteSnapshotBackend::try_new(&conn).unwrap());
        let group = store.add_course_type("Group").value;
        let hindi = store.add_course("Hindi").value;
        let offering = store
            .add_course_offering(hindi.id.clone(), group.id.clone())
            .value;
        let commit = store.add_student_registration("A. Khan", "a@x.com", offering.id);
        assert!(commit.save.is_saved());
        store.snapshot().clone()
    };

    let conn = open_db(&path).unwrap();
    let backend = SqliteSnapshotBackend::try_new(&conn).unwrap();
    match backend.load() {
        LoadOutcome::Loaded(snapshot) => assert_eq!(snapshot, expected),
        other => panic!("expected loaded snapshot, got {}", other.status()),
    }
    let reopened = RegistrationStore::open(backend);
    assert_eq!(reopened.snapshot(), &expected);
}

#[test]
fn persisted_payload_uses_camel_case_arrays() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RegistrationStore::open(SqliteSnapshotBackend::try_new(&conn).unwrap());
    store.add_course("Hindi");

    let raw = read_slot(&conn, SNAPSHOT_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["courseTypes"], serde_json::json!([]));
    assert_eq!(json["courseOfferings"], serde_json::json!([]));
    assert_eq!(json["studentRegistrations"], serde_json::json!([]));
    assert_eq!(json["courses"][0]["name"], "Hindi");
    assert!(json["courses"][0]["createdAt"].is_string());
}

#[test]
fn absent_slot_loads_as_missing_default() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteSnapshotBackend::try_new(&conn).unwrap();
    assert!(matches!(backend.load(), LoadOutcome::Missing));

    let store = RegistrationStore::open(backend);
    assert!(store.snapshot().is_empty());
}

#[test]
fn corrupt_slot_loads_as_default_and_is_overwritten_by_next_write() {
    let conn = open_db_in_memory().unwrap();
    write_slot(&conn, SNAPSHOT_STORAGE_KEY, "{\"courseTypes\": 42").unwrap();

    let backend = SqliteSnapshotBackend::try_new(&conn).unwrap();
    assert!(matches!(
        backend.load(),
        LoadOutcome::Recovered {
            error: StorageError::Malformed(_),
            ..
        }
    ));

    let mut store = RegistrationStore::open(backend);
    assert!(store.snapshot().is_empty());
    store.add_course_type("Group");

    let reloaded = SqliteSnapshotBackend::try_new(&conn)
        .unwrap()
        .load()
        .into_snapshot();
    assert_eq!(reloaded.course_types.len(), 1);
}

#[test]
fn payload_missing_a_collection_is_treated_as_corrupt() {
    let backend = MemorySnapshotBackend::with_raw(
        r#"{"courseTypes": [], "courses": [], "courseOfferings": []}"#,
    );
    assert_eq!(backend.load().status(), "recovered");
}

#[test]
fn quota_failure_is_reported_but_state_survives() {
    let mut backend = MemorySnapshotBackend::new();
    backend.set_fail_writes(true);
    let mut store = RegistrationStore::open(backend);

    let commit = store.add_course("Hindi");
    assert!(matches!(
        commit.save,
        SaveOutcome::WriteFailed(StorageError::Unavailable(_))
    ));
    assert_eq!(commit.value.name, "Hindi");
    assert_eq!(store.snapshot().courses.len(), 1);
    assert!(!store.is_persisted());
}

#[test]
fn theme_slot_is_independent_of_snapshot_slot() {
    let conn = open_db_in_memory().unwrap();
    let prefs = ThemePreference::new(&conn);
    prefs.save(Theme::Dark).unwrap();

    let mut store = RegistrationStore::open(SqliteSnapshotBackend::try_new(&conn).unwrap());
    store.add_course_type("Group");
    let group_id = store.snapshot().course_types[0].id.clone();
    store.delete_course_type(&group_id);

    assert_eq!(prefs.load().unwrap(), Some(Theme::Dark));
    assert_eq!(
        read_slot(&conn, THEME_STORAGE_KEY).unwrap().as_deref(),
        Some("dark")
    );
}

#[test]
fn custom_keys_do_not_collide() {
    let conn = open_db_in_memory().unwrap();
    let mut first = RegistrationStore::open(SqliteSnapshotBackend::with_key(&conn, "a").unwrap());
    let second = SqliteSnapshotBackend::with_key(&conn, "b").unwrap();

    first.add_course("Hindi");
    assert!(matches!(second.load(), LoadOutcome::Missing));
    assert_eq!(first.backend().key(), "a");
}
