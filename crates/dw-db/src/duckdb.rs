//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Transaction};
use crate::value::{SqlRow, SqlValue};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// DuckDB database backend
///
/// One connection behind an async mutex. An open [`DuckDbTransaction`] owns
/// the lock, so every other call waits until the transaction ends.
pub struct DuckDbBackend {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

fn execute_sync(conn: &Connection, sql: &str, params: &[&str]) -> DbResult<usize> {
    log::debug!("duckdb execute: {sql}");
    Ok(conn.execute(sql, duckdb::params_from_iter(params))?)
}

fn execute_batch_sync(conn: &Connection, sql: &str) -> DbResult<()> {
    log::debug!("duckdb execute_batch ({} bytes)", sql.len());
    Ok(conn.execute_batch(sql)?)
}

fn query_sync(conn: &Connection, sql: &str, params: &[&str]) -> DbResult<Vec<SqlRow>> {
    log::debug!("duckdb query: {sql}");
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(duckdb::params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::new();
        // Column count is only known once the statement has run, so read
        // until the row reports an out-of-range index.
        for idx in 0usize.. {
            match row.get::<_, duckdb::types::Value>(idx) {
                Ok(value) => values.push(SqlValue::from(value)),
                Err(duckdb::Error::InvalidColumnIndex(_)) => break,
                Err(e) => return Err(e.into()),
            }
        }
        out.push(values);
    }
    Ok(out)
}

fn relation_exists_sync(conn: &Connection, name: &str) -> DbResult<bool> {
    // Handle schema-qualified names
    let (schema, table) = match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    };

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        duckdb::params![schema, table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let conn = self.conn.lock().await;
        execute_sync(&conn, sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.conn.lock().await;
        execute_batch_sync(&conn, sql)
    }

    async fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<SqlRow>> {
        let conn = self.conn.lock().await;
        query_sync(&conn, sql, params)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        relation_exists_sync(&conn, name)
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let conn = self.conn.lock().await;
        execute_batch_sync(&conn, &format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
    }

    async fn begin(&self) -> DbResult<Box<dyn Transaction>> {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(DuckDbTransaction { conn, open: true }))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Transaction scope over the backend's single connection
pub struct DuckDbTransaction {
    conn: OwnedMutexGuard<Connection>,
    open: bool,
}

impl DuckDbTransaction {
    fn ensure_open(&self) -> DbResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(DbError::TransactionError(
                "transaction already finished".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Transaction for DuckDbTransaction {
    async fn execute(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.ensure_open()?;
        execute_sync(&self.conn, sql, params)
    }

    async fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.ensure_open()?;
        execute_batch_sync(&self.conn, sql)
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        self.open = false;
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        self.open = false;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

impl Drop for DuckDbTransaction {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback of abandoned transaction failed: {e}");
            }
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
