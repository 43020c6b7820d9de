//! Error types for the migration engine.

use dw_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The migration definition listing could not be read (MG001).
    #[error("[MG001] Migration source unavailable at {location}: {message}")]
    DiscoverySourceUnavailable { location: String, message: String },

    /// The ledger table could not be created or verified (MG002).
    #[error("[MG002] Ledger '{table}' unavailable")]
    LedgerUnavailable {
        table: String,
        #[source]
        source: DbError,
    },

    /// One unit failed; its transaction was rolled back and later units were
    /// not attempted (MG003).
    #[error("[MG003] Migration '{identifier}' failed: {cause}")]
    MigrationApplyFailed {
        identifier: String,
        #[source]
        cause: Box<MigrateError>,
    },

    /// The ledger already holds this identifier (MG004).
    #[error("[MG004] Ledger already records '{identifier}'; another writer or a ledger desync")]
    DuplicateLedgerEntry { identifier: String },

    /// A discovered unit's content could not be loaded (MG005).
    #[error("[MG005] Content of '{identifier}' unavailable: {message}")]
    ContentUnavailable { identifier: String, message: String },

    /// An applied unit changed after it was recorded (MG006).
    #[error("[MG006] Migration '{identifier}' changed since it was applied (recorded {recorded}, now {current})")]
    ChecksumMismatch {
        identifier: String,
        recorded: String,
        current: String,
    },

    /// Rollback step count must be positive (MG007).
    #[error("[MG007] Rollback steps must be at least 1, got {steps}")]
    InvalidSteps { steps: usize },

    /// `--to` named an identifier that discovery did not find (MG008).
    #[error("[MG008] Target migration '{identifier}' was not discovered")]
    UnknownTarget { identifier: String },

    /// Store error outside of a unit's apply transaction (MG009).
    #[error("[MG009] Store operation failed: {0}")]
    Store(#[from] DbError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Identifier of the failing unit, for errors tied to one unit
    pub fn identifier(&self) -> Option<&str> {
        match self {
            MigrateError::MigrationApplyFailed { identifier, .. }
            | MigrateError::DuplicateLedgerEntry { identifier }
            | MigrateError::ContentUnavailable { identifier, .. }
            | MigrateError::ChecksumMismatch { identifier, .. }
            | MigrateError::UnknownTarget { identifier } => Some(identifier),
            _ => None,
        }
    }
}
