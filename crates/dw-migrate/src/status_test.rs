use super::*;
use crate::migrator::MigratorOptions;
use dw_core::MemorySource;
use dw_db::{Database, DuckDbBackend};
use std::sync::Arc;

fn migrator(db: &Arc<DuckDbBackend>, source: MemorySource) -> Migrator {
    Migrator::new(db.clone(), Arc::new(source), MigratorOptions::default())
}

fn source() -> MemorySource {
    MemorySource::new()
        .with("001_init.sql", "CREATE TABLE accounts (id INTEGER);")
        .with("002_add_users.sql", "CREATE TABLE users (id INTEGER);")
}

#[tokio::test]
async fn test_status_fresh_store_all_pending() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let report = migrator(&db, source()).status().await.unwrap();

    assert_eq!(report.units.len(), 2);
    assert_eq!(report.pending_count(), 2);
    assert!(report.units.iter().all(|u| u.executed_at.is_none() && u.drift.is_none()));
    assert!(report.orphaned.is_empty());
}

#[tokio::test]
async fn test_status_follows_discovery_order() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db, source());
    m.apply().await.unwrap();

    let m = migrator(
        &db,
        source().with("000_bootstrap.sql", "CREATE TABLE boot (id INTEGER);"),
    );
    let report = m.status().await.unwrap();
    let names: Vec<&str> = report.units.iter().map(|u| u.identifier.as_str()).collect();
    assert_eq!(
        names,
        vec!["000_bootstrap.sql", "001_init.sql", "002_add_users.sql"]
    );
    assert!(!report.units[0].is_executed());
    assert!(report.units[1].is_executed());
    assert_eq!(report.executed_count(), 2);
}

#[tokio::test]
async fn test_status_reports_drift() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    migrator(&db, source()).apply().await.unwrap();

    let edited = source().with("002_add_users.sql", "CREATE TABLE users (id BIGINT);");
    let report = migrator(&db, edited).status().await.unwrap();

    assert_eq!(report.units[0].drift, Some(Drift::InSync));
    assert_eq!(report.units[1].drift, Some(Drift::Modified));
    let modified: Vec<&str> = report.modified().map(|u| u.identifier.as_str()).collect();
    assert_eq!(modified, vec!["002_add_users.sql"]);
}

#[tokio::test]
async fn test_status_unverified_without_checksum() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db, source());
    m.ensure_ledger().await.unwrap();
    db.execute(
        "INSERT INTO dw_migrations (sequence, identifier) VALUES (1, ?)",
        &["001_init.sql"],
    )
    .await
    .unwrap();

    let report = m.status().await.unwrap();
    assert_eq!(report.units[0].drift, Some(Drift::Unverified));
    assert_eq!(report.units[1].drift, None);
}

#[tokio::test]
async fn test_status_lists_orphans() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    migrator(&db, source()).apply().await.unwrap();

    let mut remaining = source();
    remaining.remove("001_init.sql");
    let report = migrator(&db, remaining).status().await.unwrap();

    assert_eq!(report.units.len(), 1);
    assert_eq!(report.orphaned.len(), 1);
    assert_eq!(report.orphaned[0].identifier, "001_init.sql");
}

#[tokio::test]
async fn test_status_is_read_only() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db, source());
    m.status().await.unwrap();
    m.status().await.unwrap();
    assert!(m.ledger().list_executed(db.as_ref()).await.unwrap().is_empty());
    assert!(!db.relation_exists("accounts").await.unwrap());
}

#[tokio::test]
async fn test_status_serializes_to_json() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db, source());
    m.apply().await.unwrap();

    let json = serde_json::to_value(m.status().await.unwrap()).unwrap();
    assert_eq!(json["units"][0]["identifier"], "001_init.sql");
    assert_eq!(json["units"][0]["drift"], "in_sync");
    assert!(json["units"][0]["executed_at"].is_string());
    assert!(json["orphaned"].as_array().unwrap().is_empty());
}

#[test]
fn test_drift_display() {
    assert_eq!(Drift::InSync.to_string(), "in sync");
    assert_eq!(Drift::Modified.to_string(), "modified");
}
