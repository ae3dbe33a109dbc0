//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `registrar_core` linkage without the Flutter runtime.
//! - Print a deterministic summary of the catalog at `REGISTRAR_DB_PATH`
//!   (or the path given as the first argument).

use registrar_core::db::open_db;
use registrar_core::{RegistrationStore, SqliteSnapshotBackend, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("registrar_core ping={}", registrar_core::ping());
    println!("registrar_core version={}", registrar_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::with_db_path(path),
        None => StoreConfig::from_env(),
    };

    match print_summary(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("registrar_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let backend = SqliteSnapshotBackend::with_key(&conn, config.snapshot_key.as_str())?;
    let store = RegistrationStore::open(backend);
    let snapshot = store.snapshot();

    println!("db_path={}", config.db_path.display());
    println!("course_types={}", snapshot.course_types.len());
    println!("courses={}", snapshot.courses.len());
    println!("course_offerings={}", snapshot.course_offerings.len());
    println!("student_registrations={}", snapshot.student_registrations.len());
    for offering in &snapshot.course_offerings {
        println!(
            "offering {} registrations={}",
            store.offering_display_name(offering),
            store.registrations_for_offering(&offering.id).len()
        );
    }
    println!(
        "dangling_references={}",
        snapshot.dangling_references().len()
    );
    Ok(())
}
