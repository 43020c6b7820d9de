use super::*;
use crate::migrator::MigratorOptions;
use dw_core::MemorySource;
use dw_db::{Database, DuckDbBackend};
use std::sync::Arc;

fn migrator(db: &Arc<DuckDbBackend>) -> Migrator {
    let source = MemorySource::new()
        .with("001_init.sql", "CREATE TABLE accounts (id INTEGER);")
        .with("002_add_users.sql", "CREATE TABLE users (id INTEGER);")
        .with("003_add_index.sql", "CREATE INDEX users_id ON users (id);");
    Migrator::new(db.clone(), Arc::new(source), MigratorOptions::default())
}

#[tokio::test]
async fn test_rollback_one_removes_latest() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db);
    m.apply().await.unwrap();

    let report = m.rollback(1).await.unwrap();
    assert_eq!(report.removed, vec!["003_add_index.sql"]);
    assert_eq!(report.warning(), Some(LEDGER_ONLY_WARNING));

    let status = m.status().await.unwrap();
    assert!(status.units[1].is_executed());
    assert!(!status.units[2].is_executed());
    // Schema is untouched
    assert!(db.relation_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_rollback_many_most_recent_first() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db);
    m.apply().await.unwrap();

    let report = m.rollback(2).await.unwrap();
    assert_eq!(report.removed, vec!["003_add_index.sql", "002_add_users.sql"]);
    assert_eq!(m.status().await.unwrap().executed_count(), 1);
}

#[tokio::test]
async fn test_rollback_more_steps_than_entries() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db);
    m.apply().await.unwrap();

    let report = m.rollback(10).await.unwrap();
    assert_eq!(report.removed.len(), 3);
    assert!(m.ledger().list_executed(db.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rollback_empty_ledger_is_noop() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let report = migrator(&db).rollback(1).await.unwrap();
    assert!(report.removed.is_empty());
    assert_eq!(report.warning(), None);
}

#[tokio::test]
async fn test_rollback_zero_steps_rejected() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db);
    m.apply().await.unwrap();

    let err = m.rollback(0).await.unwrap_err();
    assert!(matches!(err, MigrateError::InvalidSteps { steps: 0 }));
    assert_eq!(m.ledger().list_executed(db.as_ref()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_reapply_after_rollback_retries_unit() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let m = migrator(&db);
    m.apply().await.unwrap();
    m.rollback(1).await.unwrap();

    // The index still exists, so re-running its content fails
    let err = m.apply().await.unwrap_err();
    assert_eq!(err.identifier(), Some("003_add_index.sql"));

    db.execute_batch("DROP INDEX users_id").await.unwrap();
    let report = m.apply().await.unwrap();
    assert_eq!(report.applied, vec!["003_add_index.sql"]);
}
