//! End-to-end runs through the real DuckDB backend.

use sf_core::version::parse_version;
use sf_core::{CustomOptions, Direction, Version};
use sf_db::{DbError, DuckDbBackend, StorageBackend};
use sf_engine::{EngineError, Migrator, MigratorConfig, UpOutcome};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn v(raw: &str) -> Version {
    parse_version(raw).unwrap()
}

fn write_script(dir: &Path, version: &str, sql: &str) {
    let version_dir = dir.join(version);
    std::fs::create_dir_all(&version_dir).unwrap();
    std::fs::write(version_dir.join("up.sql"), sql).unwrap();
}

fn scripted_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "0.1.0",
        "CREATE TABLE customers (id INTEGER, name TEXT);",
    );
    write_script(
        dir.path(),
        "0.2.0",
        "INSERT INTO customers VALUES (1, 'ada');",
    );
    write_script(
        dir.path(),
        "0.3.0",
        "CREATE VIEW customer_names AS SELECT name FROM customers;",
    );
    dir
}

fn engine(backend: Arc<DuckDbBackend>, dir: &Path) -> Migrator {
    Migrator::new(
        MigratorConfig {
            migrations_directory: dir.to_path_buf(),
            bootstrap_version: None,
        },
        backend,
    )
}

#[tokio::test]
async fn test_full_run_records_every_step() {
    let dir = scripted_project();
    let backend = Arc::new(DuckDbBackend::in_memory().unwrap());
    let migrator = engine(backend.clone(), dir.path());
    migrator.connect().await.unwrap();

    let outcome = migrator
        .up(&v("0.3.0"), &CustomOptions::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UpOutcome::Applied(vec![v("0.1.0"), v("0.2.0"), v("0.3.0")])
    );
    for version in ["0.1.0", "0.2.0", "0.3.0"] {
        assert!(backend
            .has_migration(&v(version), Direction::Up)
            .await
            .unwrap());
    }
    assert_eq!(
        backend.get_latest_applied_migration().await.unwrap(),
        Some(v("0.3.0"))
    );
}

#[tokio::test]
async fn test_rerun_converges_without_reapplying() {
    let dir = scripted_project();
    let backend = Arc::new(DuckDbBackend::in_memory().unwrap());
    let migrator = engine(backend.clone(), dir.path());

    migrator
        .up(&v("0.3.0"), &CustomOptions::new())
        .await
        .unwrap();
    // 0.2.0's INSERT would duplicate a row if the engine reapplied it; the
    // no-op rerun must not touch the scripts at all.
    let outcome = migrator
        .up(&v("0.3.0"), &CustomOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, UpOutcome::AlreadyApplied);
}

#[tokio::test]
async fn test_failing_script_stops_the_run_then_resumes() {
    let dir = scripted_project();
    write_script(dir.path(), "0.2.0", "THIS IS NOT SQL;");

    let backend = Arc::new(DuckDbBackend::in_memory().unwrap());
    let migrator = engine(backend.clone(), dir.path());

    let err = migrator
        .up(&v("0.3.0"), &CustomOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Backend(DbError::ExecutionError(_))
    ));

    assert!(backend
        .has_migration(&v("0.1.0"), Direction::Up)
        .await
        .unwrap());
    assert!(!backend
        .has_migration(&v("0.2.0"), Direction::Up)
        .await
        .unwrap());

    // Fix the script and rerun the same target.
    write_script(
        dir.path(),
        "0.2.0",
        "INSERT INTO customers VALUES (1, 'ada');",
    );
    let outcome = migrator
        .up(&v("0.3.0"), &CustomOptions::new())
        .await
        .unwrap();
    assert_eq!(outcome, UpOutcome::Applied(vec![v("0.2.0"), v("0.3.0")]));
}

#[tokio::test]
async fn test_options_reach_the_scripts() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "0.1.0",
        "CREATE TABLE {{ var('audit_table', 'audit') }} (entry TEXT);",
    );

    let backend = Arc::new(DuckDbBackend::in_memory().unwrap());
    let migrator = engine(backend.clone(), dir.path());

    let mut options = CustomOptions::new();
    options.insert("audit_table".to_string(), serde_json::json!("audit_log"));
    migrator.up(&v("0.1.0"), &options).await.unwrap();

    assert_eq!(
        backend.get_latest_applied_migration().await.unwrap(),
        Some(v("0.1.0"))
    );
}

#[tokio::test]
async fn test_missing_script_surfaces_as_backend_error() {
    let dir = tempfile::tempdir().unwrap();
    // Catalog entry exists but carries no up.sql.
    std::fs::create_dir(dir.path().join("0.1.0")).unwrap();

    let backend = Arc::new(DuckDbBackend::in_memory().unwrap());
    let migrator = engine(backend.clone(), dir.path());

    let err = migrator
        .up(&v("0.1.0"), &CustomOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Backend(DbError::MigrationScriptMissing { .. })
    ));
    assert!(!backend
        .has_migration(&v("0.1.0"), Direction::Up)
        .await
        .unwrap());
}
