//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dw_core::{Config, DirectorySource};
use dw_db::{Database, DuckDbBackend};
use dw_migrate::{Migrator, MigratorOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// A loaded project: its root directory and parsed configuration
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project configuration.
///
/// `--config` points at an explicit file; otherwise `driftwood.yml` (or
/// `.yaml`) is read from `--project-dir`. Relative paths in the config are
/// resolved against the project directory either way.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => Config::load_from_dir(&root).context("Failed to load project")?,
    };
    Ok(ProjectContext { root, config })
}

/// Open the target store selected by `--target` / `DW_TARGET`
pub(crate) fn create_database_connection(
    project: &ProjectContext,
    target: Option<&str>,
) -> Result<Arc<dyn Database>> {
    let resolved_target = Config::resolve_target(target);
    let db_config = project
        .config
        .get_database_config(resolved_target.as_deref())
        .context("Failed to get database configuration")?;
    let path = db_config.resolved_path(&project.root);

    log::info!(
        "Connecting to {} at {}{}",
        db_config.db_type,
        path,
        resolved_target
            .as_deref()
            .map(|t| format!(" (target '{t}')"))
            .unwrap_or_default()
    );
    if db_config.is_in_memory() {
        log::warn!("Database path is :memory:; the ledger is discarded when dw exits");
    }

    let db: Arc<dyn Database> =
        Arc::new(DuckDbBackend::new(&path).context("Failed to connect to database")?);
    Ok(db)
}

/// Build a migrator over the project's migration directory and target store
pub(crate) fn build_migrator(global: &GlobalArgs) -> Result<Migrator> {
    let project = load_project(global)?;
    let db = create_database_connection(&project, global.target.as_deref())?;
    let source = DirectorySource::new(project.config.migration_path_absolute(&project.root));
    Ok(Migrator::new(
        db,
        Arc::new(source),
        MigratorOptions::from(&project.config),
    ))
}

/// Render a ledger timestamp for table output
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Calculate column widths for table output.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Left-aligned header row, a separator line of dashes, then each data row.
/// Columns are separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
