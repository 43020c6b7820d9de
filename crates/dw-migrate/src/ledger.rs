//! Ledger store: the table recording which migrations were executed and when.
//!
//! All ledger SQL lives here. Writes go through the caller's transaction so
//! a ledger row commits or rolls back together with the migration content.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, Utc};
use dw_core::{LedgerConfig, MigrationId};
use dw_db::{Database, DbError, SqlRow, Transaction};
use serde::Serialize;

/// One executed migration as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub identifier: MigrationId,
    pub executed_at: DateTime<Utc>,
    /// Insertion counter; orders entries that share a timestamp
    pub sequence: i64,
    /// Checksum of the applied content, absent for rows written elsewhere
    pub checksum: Option<String>,
}

/// Handle on the ledger table of one target store.
#[derive(Debug, Clone)]
pub struct Ledger {
    schema: Option<String>,
    table: String,
}

impl Ledger {
    /// Build a handle from the (already validated) ledger configuration
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            schema: config.schema.clone(),
            table: config.qualified_name(),
        }
    }

    /// Qualified table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger (and its schema) if absent. Safe to repeat.
    pub async fn ensure(&self, db: &dyn Database) -> MigrateResult<()> {
        let unavailable = |source: DbError| MigrateError::LedgerUnavailable {
            table: self.table.clone(),
            source,
        };

        if let Some(schema) = &self.schema {
            db.create_schema_if_not_exists(schema)
                .await
                .map_err(unavailable)?;
        }

        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 sequence    BIGINT    NOT NULL,
                 identifier  VARCHAR   NOT NULL PRIMARY KEY,
                 checksum    VARCHAR,
                 executed_at TIMESTAMPTZ NOT NULL DEFAULT now()
             )",
            self.table
        ))
        .await
        .map_err(unavailable)?;

        log::debug!("Ledger table {} ready", self.table);
        Ok(())
    }

    /// Every ledger entry, oldest execution first
    pub async fn list_executed(&self, db: &dyn Database) -> MigrateResult<Vec<LedgerEntry>> {
        let rows = db
            .query(
                &format!(
                    "SELECT identifier, epoch_us(executed_at), sequence, checksum
                     FROM {}
                     ORDER BY executed_at, sequence",
                    self.table
                ),
                &[],
            )
            .await?;

        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    fn decode(&self, row: SqlRow) -> MigrateResult<LedgerEntry> {
        let malformed = |what: &str| {
            MigrateError::Store(DbError::Internal(format!(
                "malformed row in ledger {}: {what}",
                self.table
            )))
        };

        let identifier = row
            .first()
            .and_then(|v| v.as_str())
            .and_then(MigrationId::try_new)
            .ok_or_else(|| malformed("identifier"))?;
        let executed_at = row
            .get(1)
            .and_then(|v| v.as_i64())
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .ok_or_else(|| malformed("executed_at"))?;
        let sequence = row
            .get(2)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| malformed("sequence"))?;
        let checksum = row.get(3).and_then(|v| v.as_str()).map(String::from);

        Ok(LedgerEntry {
            identifier,
            executed_at,
            sequence,
            checksum,
        })
    }

    /// Append one entry inside `tx`.
    ///
    /// A unique violation means the identifier is already recorded and is
    /// reported as [`MigrateError::DuplicateLedgerEntry`]; the caller must
    /// roll `tx` back.
    pub async fn record_execution(
        &self,
        tx: &mut dyn Transaction,
        identifier: &MigrationId,
        checksum: &str,
    ) -> MigrateResult<()> {
        tx.execute(
            &format!(
                "INSERT INTO {t} (sequence, identifier, checksum)
                 VALUES ((SELECT COALESCE(MAX(sequence), 0) + 1 FROM {t}), ?, ?)",
                t = self.table
            ),
            &[identifier.as_str(), checksum],
        )
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                MigrateError::DuplicateLedgerEntry {
                    identifier: identifier.to_string(),
                }
            } else {
                MigrateError::Store(e)
            }
        })?;
        Ok(())
    }

    /// Remove the entry for `identifier` inside `tx`; `true` if a row was removed.
    ///
    /// Only the record goes away. Whatever the migration did to the schema stays.
    pub async fn delete_execution(
        &self,
        tx: &mut dyn Transaction,
        identifier: &MigrationId,
    ) -> MigrateResult<bool> {
        let removed = tx
            .execute(
                &format!("DELETE FROM {} WHERE identifier = ?", self.table),
                &[identifier.as_str()],
            )
            .await?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
