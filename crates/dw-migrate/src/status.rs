//! Read-only status view: which discovered units ran, when, and whether their
//! content still matches what was applied.

use crate::error::MigrateResult;
use crate::ledger::LedgerEntry;
use crate::migrator::Migrator;
use chrono::{DateTime, Utc};
use dw_core::MigrationId;
use serde::Serialize;
use std::collections::HashMap;

/// Content drift of an executed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Drift {
    /// Current content hashes to the recorded checksum
    InSync,
    /// Content changed after it was applied
    Modified,
    /// The ledger row has no checksum to compare against
    Unverified,
    /// Current content could not be read, so it was not compared
    Unreadable,
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Drift::InSync => "in sync",
            Drift::Modified => "modified",
            Drift::Unverified => "unverified",
            Drift::Unreadable => "unreadable",
        };
        f.write_str(s)
    }
}

/// State of one discovered unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitStatus {
    pub identifier: MigrationId,
    /// When the unit was recorded; `None` while pending
    pub executed_at: Option<DateTime<Utc>>,
    /// `None` while pending
    pub drift: Option<Drift>,
}

impl UnitStatus {
    /// Whether a ledger row exists for this unit
    pub fn is_executed(&self) -> bool {
        self.executed_at.is_some()
    }
}

/// Result of [`Migrator::status`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// One entry per discovered unit, in discovery order
    pub units: Vec<UnitStatus>,
    /// Ledger entries whose unit is no longer discovered, oldest first
    pub orphaned: Vec<LedgerEntry>,
}

impl StatusReport {
    pub fn executed_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_executed()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.units.len() - self.executed_count()
    }

    /// Executed units whose content changed since they were applied
    pub fn modified(&self) -> impl Iterator<Item = &UnitStatus> {
        self.units
            .iter()
            .filter(|u| u.drift == Some(Drift::Modified))
    }
}

impl Migrator {
    /// Report every discovered unit with its execution time and drift.
    ///
    /// Only the ledger table is created if missing; nothing else is written.
    pub async fn status(&self) -> MigrateResult<StatusReport> {
        let plan = self.plan().await?;

        let mut executed: HashMap<&str, &LedgerEntry> = plan
            .executed
            .iter()
            .map(|e| (e.identifier.as_str(), e))
            .collect();

        let mut units = Vec::with_capacity(plan.discovered.len());
        for identifier in &plan.discovered {
            let status = match executed.remove(identifier.as_str()) {
                Some(entry) => UnitStatus {
                    identifier: identifier.clone(),
                    executed_at: Some(entry.executed_at),
                    drift: Some(self.drift_of(entry)),
                },
                None => UnitStatus {
                    identifier: identifier.clone(),
                    executed_at: None,
                    drift: None,
                },
            };
            units.push(status);
        }

        let orphaned: Vec<LedgerEntry> = plan
            .executed
            .iter()
            .filter(|e| executed.contains_key(e.identifier.as_str()))
            .cloned()
            .collect();
        for entry in &orphaned {
            log::warn!(
                "Ledger records '{}' but it is no longer in {}",
                entry.identifier,
                self.discovery.describe()
            );
        }

        Ok(StatusReport { units, orphaned })
    }

    /// A unit whose content cannot be loaded is reported, never an error.
    fn drift_of(&self, entry: &LedgerEntry) -> Drift {
        let Some(recorded) = entry.checksum.as_deref() else {
            return Drift::Unverified;
        };
        match self.discovery.load(&entry.identifier) {
            Ok(unit) if unit.checksum() == recorded => Drift::InSync,
            Ok(_) => Drift::Modified,
            Err(e) => {
                log::warn!("Cannot compare '{}' with the ledger: {e}", entry.identifier);
                Drift::Unreadable
            }
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
