//! Configuration types and parsing for driftwood.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--target` flag is given
pub const TARGET_ENV_VAR: &str = "DW_TARGET";

/// Main project configuration from driftwood.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory holding migration definition files, relative to the project root
    #[serde(default = "default_migration_path")]
    pub migration_path: String,

    /// File extension (without the dot) that marks a migration definition
    #[serde(default = "default_migration_extension")]
    pub migration_extension: String,

    /// Re-hash already applied migrations before `apply` and refuse to run
    /// when one of them changed on disk
    #[serde(default)]
    pub verify_checksums: bool,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Where the execution ledger lives
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based, or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Returns `true` for the special in-memory database path
    pub fn is_in_memory(&self) -> bool {
        self.path == MEMORY_DB_PATH
    }

    /// Resolve the database path against a project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn resolved_path(&self, root: &Path) -> String {
        if self.is_in_memory() || Path::new(&self.path).is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path).display().to_string()
        }
    }
}

/// Location of the ledger table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Optional schema; created on demand when set
    #[serde(default)]
    pub schema: Option<String>,

    /// Table name
    #[serde(default = "default_ledger_table")]
    pub table: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            schema: None,
            table: default_ledger_table(),
        }
    }
}

impl LedgerConfig {
    /// Schema-qualified table name as used in SQL
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.table),
            None => self.table.clone(),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if !is_plain_identifier(&self.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger.table '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    self.table
                ),
            });
        }
        if let Some(schema) = &self.schema {
            if !is_plain_identifier(schema) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "ledger.schema '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                        schema
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Ledger names are spliced into SQL text, so only bare identifiers are allowed.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

const MEMORY_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    MEMORY_DB_PATH.to_string()
}

fn default_migration_path() -> String {
    "migrations".to_string()
}

fn default_migration_extension() -> String {
    "sql".to_string()
}

fn default_ledger_table() -> String {
    "dw_migrations".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for driftwood.yml or driftwood.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("driftwood.yml");
        let yaml_path = dir.join("driftwood.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.migration_path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migration_path cannot be empty".to_string(),
            });
        }

        if self.migration_extension.is_empty() || self.migration_extension.starts_with('.') {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migration_extension '{}' must be non-empty and given without a leading dot",
                    self.migration_extension
                ),
            });
        }

        self.ledger.validate()
    }

    /// Get absolute migration directory relative to a project root
    pub fn migration_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migration_path)
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or DW_TARGET environment variable
    ///
    /// Priority: CLI flag > DW_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
