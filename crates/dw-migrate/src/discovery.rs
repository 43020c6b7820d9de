//! Migration discovery: filters a definition source down to migration units
//! and puts them in apply order.

use crate::error::{MigrateError, MigrateResult};
use dw_core::{CoreError, DefinitionSource, MigrationId, MigrationUnit};
use std::sync::Arc;

/// Lists and loads migration units from a [`DefinitionSource`].
#[derive(Clone)]
pub struct Discovery {
    source: Arc<dyn DefinitionSource>,
    suffix: String,
}

impl Discovery {
    /// Create a discovery over `source`, recognizing entries ending in `.{extension}`
    pub fn new(source: Arc<dyn DefinitionSource>, extension: &str) -> Self {
        Self {
            source,
            suffix: format!(".{extension}"),
        }
    }

    /// Suffix marker, including the leading dot
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Location of the underlying source
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    fn is_migration(&self, name: &str) -> bool {
        name.len() > self.suffix.len() && name.ends_with(&self.suffix)
    }

    /// Every migration identifier in the source, ascending.
    ///
    /// Entries without the suffix marker are ignored. Two calls against an
    /// unchanged source return the same sequence.
    pub fn list_units(&self) -> MigrateResult<Vec<MigrationId>> {
        let entries = self.source.list_entries().map_err(|e| match e {
            CoreError::SourceUnavailable { location, message } => {
                MigrateError::DiscoverySourceUnavailable { location, message }
            }
            other => MigrateError::DiscoverySourceUnavailable {
                location: self.source.describe(),
                message: other.to_string(),
            },
        })?;

        let mut units: Vec<MigrationId> = entries
            .into_iter()
            .filter(|name| {
                let keep = self.is_migration(name);
                if !keep {
                    log::debug!("Ignoring non-migration entry '{name}'");
                }
                keep
            })
            .filter_map(MigrationId::try_new)
            .collect();
        units.sort();
        units.dedup();
        Ok(units)
    }

    /// Load one unit's content from the source
    pub fn load(&self, identifier: &MigrationId) -> MigrateResult<MigrationUnit> {
        let content =
            self.source
                .load(identifier.as_str())
                .map_err(|e| MigrateError::ContentUnavailable {
                    identifier: identifier.to_string(),
                    message: e.to_string(),
                })?;
        Ok(MigrationUnit::new(identifier.clone(), content))
    }
}
