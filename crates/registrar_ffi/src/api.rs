//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose catalog operations to Dart as sync, envelope-returning functions.
//! - Build a store per call from the configured database; no global store.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Validation failures surface as `ok = false` with the user-facing message.
//! - A write that did not persist is still `ok = true`, flagged by `persisted`.

use log::error;
use registrar_core::db::open_db;
use registrar_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, resolve_theme, CatalogError, CatalogService, Commit, SqliteSnapshotBackend, StoreConfig,
    Theme, ThemePreference,
};
use std::sync::OnceLock;

static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// A blank `level` picks the build-mode default (`debug` or `info`).
/// Returns an empty string on success and an error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => default_log_level(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for every mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or updated entity.
    pub entity_id: Option<String>,
    /// Whether the new state reached durable storage.
    pub persisted: bool,
    /// Human-readable message for UI display.
    pub message: String,
}

impl ActionResponse {
    fn success<T>(message: impl Into<String>, entity_id: Option<String>, commit: &Commit<T>) -> Self {
        Self {
            ok: true,
            entity_id,
            persisted: commit.save.is_saved(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            persisted: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedItem {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingItem {
    pub id: String,
    pub course_id: String,
    pub course_type_id: String,
    /// `"{course type} - {course}"`, with `Unknown` for missing sides.
    pub display_name: String,
    pub registration_count: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationItem {
    pub id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_offering_id: String,
    pub registered_at: String,
}

/// Read-only view of the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogView {
    pub course_types: Vec<NamedItem>,
    pub courses: Vec<NamedItem>,
    pub offerings: Vec<OfferingItem>,
    pub registrations: Vec<RegistrationItem>,
    /// Empty on success; otherwise why the view is empty.
    pub message: String,
}

/// Counts shown in the delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionImpactResponse {
    pub ok: bool,
    pub offerings: u32,
    pub registrations: u32,
    pub message: String,
}

/// Returns the current catalog, optionally filtered to one course type.
///
/// The filter applies to `offerings` only.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_snapshot(course_type_filter: Option<String>) -> CatalogView {
    let filter = course_type_filter
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let result = with_catalog(|service| {
        let store = service.store();
        let snapshot = store.snapshot();
        let offerings = match filter.as_deref() {
            Some(course_type_id) => store.offerings_for_course_type(course_type_id),
            None => snapshot.course_offerings.iter().collect(),
        };
        let offerings = offerings
            .into_iter()
            .map(|o| OfferingItem {
                id: o.id.clone(),
                course_id: o.course_id.clone(),
                course_type_id: o.course_type_id.clone(),
                display_name: store.offering_display_name(o),
                registration_count: count_u32(store.registrations_for_offering(&o.id).len()),
                created_at: o.created_at.clone(),
            })
            .collect();
        Ok(CatalogView {
            course_types: snapshot
                .course_types
                .iter()
                .map(|t| named_item(&t.id, &t.name, &t.created_at))
                .collect(),
            courses: snapshot
                .courses
                .iter()
                .map(|c| named_item(&c.id, &c.name, &c.created_at))
                .collect(),
            offerings,
            registrations: snapshot
                .student_registrations
                .iter()
                .map(|r| RegistrationItem {
                    id: r.id.clone(),
                    student_name: r.student_name.clone(),
                    student_email: r.student_email.clone(),
                    course_offering_id: r.course_offering_id.clone(),
                    registered_at: r.registered_at.clone(),
                })
                .collect(),
            message: String::new(),
        })
    });
    result.unwrap_or_else(|message| CatalogView {
        message,
        ..CatalogView::default()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_type_add(name: String) -> ActionResponse {
    respond("course_type_add", |service| {
        let commit = service.create_course_type(&name)?;
        let id = commit.value.id.clone();
        Ok(ActionResponse::success("Course type created.", Some(id), &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_type_update(id: String, name: String) -> ActionResponse {
    respond("course_type_update", |service| {
        let commit = service.rename_course_type(&id, &name)?;
        Ok(ActionResponse::success("Course type updated.", Some(id.clone()), &commit))
    })
}

/// Deletes a course type with its offerings and their registrations.
#[flutter_rust_bridge::frb(sync)]
pub fn course_type_delete(id: String) -> ActionResponse {
    respond("course_type_delete", |service| {
        let commit = service.delete_course_type(&id)?;
        let message = cascade_message("Course type", &commit.value);
        Ok(ActionResponse::success(message, None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_add(name: String) -> ActionResponse {
    respond("course_add", |service| {
        let commit = service.create_course(&name)?;
        let id = commit.value.id.clone();
        Ok(ActionResponse::success("Course created.", Some(id), &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn course_update(id: String, name: String) -> ActionResponse {
    respond("course_update", |service| {
        let commit = service.rename_course(&id, &name)?;
        Ok(ActionResponse::success("Course updated.", Some(id.clone()), &commit))
    })
}

/// Deletes a course with its offerings and their registrations.
#[flutter_rust_bridge::frb(sync)]
pub fn course_delete(id: String) -> ActionResponse {
    respond("course_delete", |service| {
        let commit = service.delete_course(&id)?;
        let message = cascade_message("Course", &commit.value);
        Ok(ActionResponse::success(message, None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn offering_add(course_id: String, course_type_id: String) -> ActionResponse {
    respond("offering_add", |service| {
        let commit = service.create_offering(&course_id, &course_type_id)?;
        let id = commit.value.id.clone();
        Ok(ActionResponse::success("Course offering created.", Some(id), &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn offering_update(id: String, course_id: String, course_type_id: String) -> ActionResponse {
    respond("offering_update", |service| {
        let commit = service.update_offering(&id, &course_id, &course_type_id)?;
        Ok(ActionResponse::success("Course offering updated.", Some(id.clone()), &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn offering_delete(id: String) -> ActionResponse {
    respond("offering_delete", |service| {
        let commit = service.delete_offering(&id)?;
        let message = cascade_message("Course offering", &commit.value);
        Ok(ActionResponse::success(message, None, &commit))
    })
}

/// Counts the registrations an offering delete would remove.
#[flutter_rust_bridge::frb(sync)]
pub fn offering_deletion_impact(id: String) -> DeletionImpactResponse {
    let result = with_catalog(|service| {
        service
            .offering_deletion_impact(&id)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(impact) => DeletionImpactResponse {
            ok: true,
            offerings: count_u32(impact.offerings),
            registrations: count_u32(impact.registrations),
            message: if impact.cascades() {
                format!(
                    "This will delete {} student registration(s). Continue?",
                    impact.registrations
                )
            } else {
                String::new()
            },
        },
        Err(message) => DeletionImpactResponse {
            ok: false,
            offerings: 0,
            registrations: 0,
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_register(
    student_name: String,
    student_email: String,
    course_offering_id: String,
) -> ActionResponse {
    respond("student_register", |service| {
        let commit =
            service.register_student(&student_name, &student_email, &course_offering_id)?;
        let message = format!(
            "Successfully registered {} for the course!",
            commit.value.student_name
        );
        let id = commit.value.id.clone();
        Ok(ActionResponse::success(message, Some(id), &commit))
    })
}

/// Returns the effective theme (`light|dark`).
///
/// `system_prefers_dark` is the platform setting, used when nothing is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_get(system_prefers_dark: Option<bool>) -> String {
    let stored = with_theme(|prefs| prefs.load().map_err(|err| err.to_string()))
        .unwrap_or_else(|err| {
            error!("event=theme_get module=ffi status=error error={err}");
            None
        });
    resolve_theme(stored, system_prefers_dark).as_str().to_string()
}

/// Stores `theme` (`light|dark`). Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(theme: String) -> String {
    let parsed = match theme.trim().parse::<Theme>() {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    match with_theme(|prefs| prefs.save(parsed).map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

fn store_config() -> &'static StoreConfig {
    STORE_CONFIG.get_or_init(StoreConfig::from_env)
}

fn with_catalog<T>(
    f: impl FnOnce(&mut CatalogService<SqliteSnapshotBackend<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = store_config();
    let conn = open_db(&config.db_path).map_err(|err| format!("catalog DB open failed: {err}"))?;
    let backend = SqliteSnapshotBackend::with_key(&conn, config.snapshot_key.as_str())
        .map_err(|err| format!("catalog backend init failed: {err}"))?;
    let mut service = CatalogService::open(backend);
    f(&mut service)
}

fn with_theme<T>(f: impl FnOnce(&ThemePreference<'_>) -> Result<T, String>) -> Result<T, String> {
    let config = store_config();
    let conn = open_db(&config.db_path).map_err(|err| format!("theme DB open failed: {err}"))?;
    let prefs = ThemePreference::with_key(&conn, config.theme_key.as_str());
    f(&prefs)
}

fn respond(
    operation: &'static str,
    f: impl FnOnce(
        &mut CatalogService<SqliteSnapshotBackend<'_>>,
    ) -> Result<ActionResponse, CatalogError>,
) -> ActionResponse {
    match with_catalog(|service| Ok(f(service))) {
        Ok(Ok(response)) => response,
        Ok(Err(validation)) => ActionResponse::failure(validation.to_string()),
        Err(err) => {
            error!("event=ffi_call module=ffi status=error op={operation} error={err}");
            ActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn cascade_message(label: &str, report: &registrar_core::CascadeReport) -> String {
    format!(
        "{label} deleted with {} offering(s) and {} registration(s).",
        report.removed_offering_ids.len(),
        report.removed_registration_ids.len()
    )
}

fn named_item(id: &str, name: &str, created_at: &str) -> NamedItem {
    NamedItem {
        id: id.to_string(),
        name: name.to_string(),
        created_at: created_at.to_string(),
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        catalog_snapshot, core_version, course_add, course_delete, course_type_add,
        course_type_delete, course_type_update, course_update, init_logging, offering_add,
        offering_delete, offering_deletion_impact, offering_update, ping, student_register,
        theme_get, theme_set, STORE_CONFIG,
    };
    use registrar_core::{default_log_level, logging_status, StoreConfig};
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    static SERIAL: Mutex<()> = Mutex::new(());

    /// Points the facade at a private database and serializes callers,
    /// since every call reads and rewrites the whole snapshot.
    fn isolated() -> MutexGuard<'static, ()> {
        let dir = TEST_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        STORE_CONFIG.get_or_init(|| StoreConfig::with_db_path(dir.path().join("ffi.db")));
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn register_then_delete_course_cascades() {
        let _guard = isolated();
        let type_name = unique_token("type");
        let course_name = unique_token("course");

        let kind = course_type_add(type_name.clone());
        assert!(kind.ok, "{}", kind.message);
        assert!(kind.persisted);
        let course = course_add(course_name.clone());
        assert!(course.ok, "{}", course.message);
        let course_id = course.entity_id.expect("course id");
        let offering = offering_add(course_id.clone(), kind.entity_id.expect("type id"));
        assert!(offering.ok, "{}", offering.message);
        let offering_id = offering.entity_id.expect("offering id");

        let registered = student_register(
            "A. Khan".to_string(),
            "a@x.com".to_string(),
            offering_id.clone(),
        );
        assert!(registered.ok, "{}", registered.message);
        assert_eq!(
            registered.message,
            "Successfully registered A. Khan for the course!"
        );

        let view = catalog_snapshot(None);
        let item = view
            .offerings
            .iter()
            .find(|item| item.id == offering_id)
            .expect("offering listed");
        assert_eq!(item.display_name, format!("{type_name} - {course_name}"));
        assert_eq!(item.registration_count, 1);

        let impact = offering_deletion_impact(offering_id.clone());
        assert!(impact.ok);
        assert_eq!(impact.registrations, 1);

        let deleted = course_delete(course_id);
        assert!(deleted.ok, "{}", deleted.message);
        let view = catalog_snapshot(None);
        assert!(view.offerings.iter().all(|item| item.id != offering_id));
        assert!(view
            .registrations
            .iter()
            .all(|item| item.course_offering_id != offering_id));
        assert!(view.course_types.iter().any(|item| item.name == type_name));
    }

    #[test]
    fn blank_level_initializes_with_build_default() {
        let _guard = isolated();
        let log_dir = TEST_DIR.get().expect("test dir").path().join("logs");
        let log_dir = log_dir.to_str().expect("utf-8 temp path").to_string();

        assert_eq!(init_logging("  ".to_string(), log_dir), "");
        let (level, _) = logging_status().expect("logging should be active");
        assert_eq!(level, default_log_level());
    }

    #[test]
    fn updates_rename_and_repoint_in_place() {
        let _guard = isolated();
        let group = course_type_add(unique_token("group"));
        let solo = course_type_add(unique_token("solo"));
        let course = course_add(unique_token("course"));
        let group_id = group.entity_id.expect("group id");
        let solo_id = solo.entity_id.expect("solo id");
        let course_id = course.entity_id.expect("course id");

        let renamed_type = unique_token("renamed-type");
        let updated = course_type_update(group_id.clone(), renamed_type.clone());
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.entity_id.as_deref(), Some(group_id.as_str()));
        let renamed_course = unique_token("renamed-course");
        assert!(course_update(course_id.clone(), renamed_course.clone()).ok);

        let offering = offering_add(course_id.clone(), group_id.clone());
        let offering_id = offering.entity_id.expect("offering id");
        let repointed = offering_update(offering_id.clone(), course_id.clone(), solo_id.clone());
        assert!(repointed.ok, "{}", repointed.message);

        let view = catalog_snapshot(Some(solo_id.clone()));
        let item = view
            .offerings
            .iter()
            .find(|item| item.id == offering_id)
            .expect("offering filtered under new type");
        assert_eq!(item.course_type_id, solo_id);
        assert!(item.display_name.ends_with(&renamed_course));
        assert!(catalog_snapshot(Some(group_id.clone()))
            .offerings
            .iter()
            .all(|item| item.id != offering_id));
        assert!(view
            .course_types
            .iter()
            .any(|item| item.id == group_id && item.name == renamed_type));

        let missing = course_type_update("ghost".to_string(), unique_token("x"));
        assert!(!missing.ok);
        assert_eq!(missing.message, "Course type not found: ghost");
    }

    #[test]
    fn deletes_report_cascade_counts() {
        let _guard = isolated();
        let kind = course_type_add(unique_token("type"));
        let course = course_add(unique_token("course"));
        let type_id = kind.entity_id.expect("type id");
        let course_id = course.entity_id.expect("course id");
        let offering = offering_add(course_id.clone(), type_id.clone());
        let offering_id = offering.entity_id.expect("offering id");
        assert!(student_register(
            "A. Khan".to_string(),
            "a@x.com".to_string(),
            offering_id.clone()
        )
        .ok);

        let deleted = offering_delete(offering_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.persisted);
        assert_eq!(
            deleted.message,
            "Course offering deleted with 1 offering(s) and 1 registration(s)."
        );
        assert!(!offering_delete(offering_id).ok);

        let second = offering_add(course_id, type_id.clone());
        let second_id = second.entity_id.expect("offering id");
        let deleted = course_type_delete(type_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(
            deleted.message,
            "Course type deleted with 1 offering(s) and 0 registration(s)."
        );
        let view = catalog_snapshot(None);
        assert!(view.course_types.iter().all(|item| item.id != type_id));
        assert!(view.offerings.iter().all(|item| item.id != second_id));
    }

    #[test]
    fn validation_errors_surface_as_messages() {
        let _guard = isolated();
        let name = unique_token("dup");
        assert!(course_add(name.clone()).ok);

        let duplicate = course_add(name.to_uppercase());
        assert!(!duplicate.ok);
        assert_eq!(duplicate.message, "Course already exists");

        let bad_email = student_register(
            "A. Khan".to_string(),
            "not-an-email".to_string(),
            "whatever".to_string(),
        );
        assert!(!bad_email.ok);
        assert_eq!(bad_email.message, "Please enter a valid email address");
    }

    #[test]
    fn theme_round_trips_and_rejects_unknown_values() {
        let _guard = isolated();
        assert_eq!(theme_set("dark".to_string()), "");
        assert_eq!(theme_get(Some(false)), "dark");
        assert_eq!(theme_set("light".to_string()), "");
        assert_eq!(theme_get(Some(true)), "light");
        assert!(!theme_set("sepia".to_string()).is_empty());
    }
}
