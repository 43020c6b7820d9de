//! End-to-end scenarios: directory source, file-backed DuckDB, full engine

use dw_core::{Config, DirectorySource};
use dw_db::{Database, DuckDbBackend};
use dw_migrate::{Drift, MigrateError, Migrator, MigratorOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/shop";

/// Copy the fixture project into a temp dir so scenarios can edit files
fn scratch_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let src = Path::new(FIXTURE);
    fs::copy(src.join("driftwood.yml"), dir.path().join("driftwood.yml")).unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    for entry in fs::read_dir(src.join("migrations")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), migrations.join(entry.file_name())).unwrap();
    }
    dir
}

fn migrations_dir(project: &TempDir) -> PathBuf {
    project.path().join("migrations")
}

fn open(project: &TempDir) -> (Arc<DuckDbBackend>, Migrator) {
    let config = Config::load_from_dir(project.path()).unwrap();
    let db = Arc::new(DuckDbBackend::from_path(&project.path().join("shop.duckdb")).unwrap());
    let source = DirectorySource::new(config.migration_path_absolute(project.path()));
    let migrator = Migrator::new(
        db.clone(),
        Arc::new(source),
        MigratorOptions::from(&config),
    );
    (db, migrator)
}

#[test]
fn test_fixture_config_loads() {
    let config = Config::load_from_dir(Path::new(FIXTURE)).unwrap();
    assert_eq!(config.name, "shop");
    assert_eq!(config.migration_extension, "sql");
}

#[tokio::test]
async fn test_apply_status_rollback_cycle() {
    let project = scratch_project();
    let (db, migrator) = open(&project);

    let report = migrator.apply().await.unwrap();
    assert_eq!(
        report.applied,
        vec!["001_init.sql", "002_add_users.sql", "003_add_index.sql"]
    );

    let status = migrator.status().await.unwrap();
    assert_eq!(status.units.len(), 3);
    assert!(status.units.iter().all(|u| u.drift == Some(Drift::InSync)));

    let rolled = migrator.rollback(1).await.unwrap();
    assert_eq!(rolled.removed, vec!["003_add_index.sql"]);

    let status = migrator.status().await.unwrap();
    assert_eq!(status.pending_count(), 1);
    assert!(!status.units[2].is_executed());
    assert!(db.relation_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let project = scratch_project();
    {
        let (_db, migrator) = open(&project);
        migrator.apply().await.unwrap();
    }

    let (_db, migrator) = open(&project);
    let report = migrator.apply().await.unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, 3);
}

#[tokio::test]
async fn test_failing_middle_unit_leaves_prefix() {
    let project = scratch_project();
    fs::write(
        migrations_dir(&project).join("002_add_users.sql"),
        "CREATE TABLE users (id INTEGER);\nINSERT INTO users VALUES ('not a number');",
    )
    .unwrap();
    let (db, migrator) = open(&project);

    let err = migrator.apply().await.unwrap_err();
    assert!(matches!(err, MigrateError::MigrationApplyFailed { .. }));
    assert_eq!(err.identifier(), Some("002_add_users.sql"));
    assert!(err.to_string().contains("[MG003]"));

    let executed = migrator
        .ledger()
        .list_executed(db.as_ref())
        .await
        .unwrap();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].identifier, "001_init.sql");
    assert!(!db.relation_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_edited_and_deleted_files_show_as_drift() {
    let project = scratch_project();
    let (_db, migrator) = open(&project);
    migrator.apply().await.unwrap();

    let dir = migrations_dir(&project);
    fs::write(
        dir.join("002_add_users.sql"),
        "CREATE TABLE users (id BIGINT PRIMARY KEY);",
    )
    .unwrap();
    fs::remove_file(dir.join("001_init.sql")).unwrap();

    let status = migrator.status().await.unwrap();
    assert_eq!(status.units.len(), 2);
    assert_eq!(status.units[0].drift, Some(Drift::Modified));
    assert_eq!(status.orphaned.len(), 1);
    assert_eq!(status.orphaned[0].identifier, "001_init.sql");
}

#[tokio::test]
async fn test_unreadable_applied_file_still_reports_every_unit() {
    let project = scratch_project();
    let (_db, migrator) = open(&project);
    migrator.apply().await.unwrap();

    fs::write(migrations_dir(&project).join("001_init.sql"), [0xff, 0xfe, 0x00]).unwrap();

    let status = migrator.status().await.unwrap();
    assert_eq!(status.units.len(), 3);
    assert_eq!(status.executed_count(), 3);
    assert_eq!(status.units[0].drift, Some(Drift::Unreadable));
    assert_eq!(status.units[1].drift, Some(Drift::InSync));
    assert!(status.orphaned.is_empty());
}

#[tokio::test]
async fn test_missing_migration_dir_is_reported() {
    let project = scratch_project();
    fs::remove_dir_all(migrations_dir(&project)).unwrap();
    let (_db, migrator) = open(&project);

    let err = migrator.apply().await.unwrap_err();
    assert!(matches!(
        err,
        MigrateError::DiscoverySourceUnavailable { .. }
    ));
}
