//! Ledger-only rollback.
//!
//! Removes the most recent ledger entries so the corresponding units become
//! pending again. Schema changes made by those units are left in place.

use crate::error::{MigrateError, MigrateResult};
use crate::migrator::Migrator;
use dw_core::MigrationId;
use serde::Serialize;

/// Warning emitted whenever a rollback removes at least one ledger entry
pub const LEDGER_ONLY_WARNING: &str =
    "rollback removed ledger records only; schema changes made by those migrations were not reverted";

/// Outcome of [`Migrator::rollback`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollbackReport {
    /// Removed identifiers, most recent first
    pub removed: Vec<MigrationId>,
}

impl RollbackReport {
    /// The ledger-only warning, when anything was removed
    pub fn warning(&self) -> Option<&'static str> {
        (!self.removed.is_empty()).then_some(LEDGER_ONLY_WARNING)
    }
}

impl Migrator {
    /// Remove the `steps` most recently executed ledger entries.
    ///
    /// All deletions share one transaction. An empty ledger yields an empty
    /// report.
    pub async fn rollback(&self, steps: usize) -> MigrateResult<RollbackReport> {
        if steps == 0 {
            return Err(MigrateError::InvalidSteps { steps });
        }

        self.ensure_ledger().await?;
        let executed = self.ledger.list_executed(self.db.as_ref()).await?;
        let selected: Vec<MigrationId> = executed
            .into_iter()
            .rev()
            .take(steps)
            .map(|e| e.identifier)
            .collect();

        if selected.is_empty() {
            log::info!("Ledger {} is empty; nothing to roll back", self.ledger.table());
            return Ok(RollbackReport::default());
        }

        let mut tx = self.db.begin().await?;
        let outcome: MigrateResult<Vec<MigrationId>> = async {
            let mut removed = Vec::with_capacity(selected.len());
            for identifier in &selected {
                if self.ledger.delete_execution(tx.as_mut(), identifier).await? {
                    removed.push(identifier.clone());
                }
            }
            Ok(removed)
        }
        .await;

        let removed = match outcome {
            Ok(removed) => {
                tx.commit().await?;
                removed
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::warn!("Rollback of ledger deletions failed: {rollback_err}");
                }
                return Err(e);
            }
        };
        drop(tx);

        for identifier in &removed {
            log::info!("Removed ledger entry {identifier}");
        }
        if !removed.is_empty() {
            log::warn!("{LEDGER_ONLY_WARNING}");
        }

        Ok(RollbackReport { removed })
    }
}

#[cfg(test)]
#[path = "rollback_test.rs"]
mod tests;
