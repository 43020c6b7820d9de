//! Migration engine for Driftwood.
//!
//! Discovers ordered migration units from a [`dw_core::DefinitionSource`],
//! applies each pending unit exactly once inside its own transaction, and
//! keeps an execution ledger table in the target store. Status and rollback
//! read and edit that ledger; rollback never touches applied schema.

pub mod discovery;
pub mod error;
pub mod ledger;
pub mod migrator;
pub mod rollback;
pub mod status;

pub use discovery::Discovery;
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerEntry};
pub use migrator::{ApplyOptions, ApplyReport, Migrator, MigratorOptions, Plan};
pub use rollback::{RollbackReport, LEDGER_ONLY_WARNING};
pub use status::{Drift, StatusReport, UnitStatus};
