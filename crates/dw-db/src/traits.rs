//! Store trait definitions

use crate::error::DbResult;
use crate::value::SqlRow;
use async_trait::async_trait;

/// Database abstraction trait for Driftwood
///
/// Implementations must be Send + Sync for async operation. Parameters are
/// positional text values bound to `?` placeholders.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement, returns affected rows
    async fn execute(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and collect every row
    async fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<SqlRow>>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Open a transaction scope.
    ///
    /// The returned transaction holds the connection until it is committed,
    /// rolled back or dropped; this handle must not be used in the meantime.
    async fn begin(&self) -> DbResult<Box<dyn Transaction>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// An open transaction scope.
///
/// Dropping a transaction that was neither committed nor rolled back rolls it
/// back, so a cancelled future never leaves half of its writes behind.
#[async_trait]
pub trait Transaction: Send {
    /// Execute one statement inside the transaction
    async fn execute(&mut self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Execute multiple statements inside the transaction
    async fn execute_batch(&mut self, sql: &str) -> DbResult<()>;

    /// Make every write of this scope durable
    async fn commit(&mut self) -> DbResult<()>;

    /// Discard every write of this scope
    async fn rollback(&mut self) -> DbResult<()>;
}
