//! dw-core - Core library for Driftwood
//!
//! This crate provides the project configuration (`driftwood.yml`), the
//! strongly-typed migration identifier, content checksums, and the
//! definition sources that migration discovery reads from.

pub mod checksum;
pub mod config;
pub mod error;
pub mod migration;
pub mod source;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, DbType, LedgerConfig, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use migration::{MigrationId, MigrationUnit};
pub use source::{DefinitionSource, DirectorySource, MemorySource};
