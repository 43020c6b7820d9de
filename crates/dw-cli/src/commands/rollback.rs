//! Rollback command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::build_migrator;

/// Execute the rollback command
pub async fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global)?;
    let report = migrator
        .rollback(args.steps)
        .await
        .context("Rollback failed")?;

    if report.removed.is_empty() {
        println!("Ledger is empty; nothing to roll back.");
        return Ok(());
    }

    for id in &report.removed {
        println!("  removed  {id}");
    }
    if let Some(warning) = report.warning() {
        eprintln!("Warning: {warning}");
    }
    Ok(())
}
