//! dw-db - Database abstraction layer for Driftwood
//!
//! This crate provides the `Database` and `Transaction` traits the migration
//! engine is written against, and the DuckDB implementation of both.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Transaction};
pub use value::{SqlRow, SqlValue};
