//! Executor: computes the pending set and applies it one transaction per unit.

use crate::discovery::Discovery;
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, LedgerEntry};
use dw_core::{Config, DefinitionSource, LedgerConfig, MigrationId};
use dw_db::Database;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Engine settings that do not come from the store or the source
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    /// Extension marking migration files, without the dot
    pub extension: String,
    /// Ledger table location
    pub ledger: LedgerConfig,
    /// Default for [`ApplyOptions::verify_checksums`]
    pub verify_checksums: bool,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            extension: "sql".to_string(),
            ledger: LedgerConfig::default(),
            verify_checksums: false,
        }
    }
}

impl From<&Config> for MigratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            extension: config.migration_extension.clone(),
            ledger: config.ledger.clone(),
            verify_checksums: config.verify_checksums,
        }
    }
}

/// Per-call options for [`Migrator::apply_with`]
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Stop after this identifier (inclusive)
    pub target: Option<MigrationId>,
    /// Refuse to run when an applied unit changed on disk
    pub verify_checksums: bool,
}

/// Outcome of a successful apply
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    /// Units applied by this call, in the order they committed
    pub applied: Vec<MigrationId>,
    /// Discovered units that were already in the ledger
    pub skipped: usize,
}

/// Pending-set computation, without applying anything
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Every discovered unit, in apply order
    pub discovered: Vec<MigrationId>,
    /// Current ledger contents, oldest first
    pub executed: Vec<LedgerEntry>,
    /// Discovered units absent from the ledger, in apply order
    pub pending: Vec<MigrationId>,
}

impl Plan {
    /// Discovered units already present in the ledger
    pub fn skipped(&self) -> usize {
        self.discovered.len() - self.pending.len()
    }

    /// Pending units ordered at or before `target` (all of them without one).
    ///
    /// `target` must be a discovered identifier.
    pub fn pending_through(
        &self,
        target: Option<&MigrationId>,
    ) -> MigrateResult<Vec<&MigrationId>> {
        let Some(target) = target else {
            return Ok(self.pending.iter().collect());
        };
        if self.discovered.binary_search(target).is_err() {
            return Err(MigrateError::UnknownTarget {
                identifier: target.to_string(),
            });
        }
        Ok(self.pending.iter().filter(|id| *id <= target).collect())
    }
}

/// The migration engine.
///
/// Holds the store handle, the discovery over a definition source and the
/// ledger handle. Every operation ensures the ledger before touching it.
/// Single-writer: nothing here guards against another process applying
/// against the same store at the same time.
pub struct Migrator {
    pub(crate) db: Arc<dyn Database>,
    pub(crate) discovery: Discovery,
    pub(crate) ledger: Ledger,
    verify_checksums: bool,
}

impl Migrator {
    /// Create a migrator over explicit collaborators
    pub fn new(
        db: Arc<dyn Database>,
        source: Arc<dyn DefinitionSource>,
        options: MigratorOptions,
    ) -> Self {
        Self {
            db,
            discovery: Discovery::new(source, &options.extension),
            ledger: Ledger::new(&options.ledger),
            verify_checksums: options.verify_checksums,
        }
    }

    /// Ledger handle used by this migrator
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Discovery used by this migrator
    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    /// Create the ledger table if it does not exist yet
    pub async fn ensure_ledger(&self) -> MigrateResult<()> {
        self.ledger.ensure(self.db.as_ref()).await
    }

    /// Compute discovered, executed and pending sets without applying anything
    pub async fn plan(&self) -> MigrateResult<Plan> {
        self.ensure_ledger().await?;
        let discovered = self.discovery.list_units()?;
        let executed = self.ledger.list_executed(self.db.as_ref()).await?;

        let recorded: HashSet<&str> = executed.iter().map(|e| e.identifier.as_str()).collect();
        let pending = discovered
            .iter()
            .filter(|id| !recorded.contains(id.as_str()))
            .cloned()
            .collect();

        Ok(Plan {
            discovered,
            executed,
            pending,
        })
    }

    /// Options `apply` runs with: no target, configured checksum policy
    pub fn default_apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            target: None,
            verify_checksums: self.verify_checksums,
        }
    }

    /// Apply every pending unit, using the configured defaults
    pub async fn apply(&self) -> MigrateResult<ApplyReport> {
        self.apply_with(&self.default_apply_options()).await
    }

    /// Apply pending units in order, each in its own transaction.
    ///
    /// Stops at the first failure with [`MigrateError::MigrationApplyFailed`].
    /// Units committed earlier in the same call stay committed, so the ledger
    /// always holds a leading run of the discovered order.
    pub async fn apply_with(&self, options: &ApplyOptions) -> MigrateResult<ApplyReport> {
        let plan = self.plan().await?;
        let pending = plan.pending_through(options.target.as_ref())?;

        if options.verify_checksums {
            self.verify_applied(&plan)?;
        }

        if pending.is_empty() {
            log::info!("No pending migrations in {}", self.discovery.describe());
        } else {
            log::info!("Applying {} pending migration(s)", pending.len());
        }

        let mut applied = Vec::with_capacity(pending.len());
        for identifier in pending {
            self.apply_unit(identifier)
                .await
                .map_err(|cause| MigrateError::MigrationApplyFailed {
                    identifier: identifier.to_string(),
                    cause: Box::new(cause),
                })?;
            log::info!("Applied {identifier}");
            applied.push(identifier.clone());
        }

        Ok(ApplyReport {
            applied,
            skipped: plan.skipped(),
        })
    }

    /// Load, execute and record one unit inside a single transaction.
    async fn apply_unit(&self, identifier: &MigrationId) -> MigrateResult<()> {
        let unit = self.discovery.load(identifier)?;
        let checksum = unit.checksum();

        let mut tx = self.db.begin().await?;

        let outcome: MigrateResult<()> = async {
            if unit.is_blank() {
                log::debug!("{identifier} has no statements; recording only");
            } else {
                tx.execute_batch(&unit.content).await?;
            }
            self.ledger
                .record_execution(tx.as_mut(), identifier, &checksum)
                .await
        }
        .await;

        match outcome {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::warn!("Rollback of {identifier} failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    /// Fail when a discovered, already applied unit no longer hashes to the
    /// checksum recorded for it.
    pub fn verify_applied(&self, plan: &Plan) -> MigrateResult<()> {
        let discovered: HashSet<&str> = plan.discovered.iter().map(|id| id.as_str()).collect();
        for entry in &plan.executed {
            let Some(recorded) = entry.checksum.as_deref() else {
                continue;
            };
            if !discovered.contains(entry.identifier.as_str()) {
                continue;
            }
            let current = self.discovery.load(&entry.identifier)?.checksum();
            if current != recorded {
                return Err(MigrateError::ChecksumMismatch {
                    identifier: entry.identifier.to_string(),
                    recorded: recorded.to_string(),
                    current,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
