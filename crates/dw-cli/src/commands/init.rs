//! Init command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, InitArgs};
use crate::commands::common::build_migrator;

/// Execute the init command
pub async fn execute(_args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global)?;
    migrator
        .ensure_ledger()
        .await
        .context("Failed to initialize ledger")?;

    println!("Ledger table {} is ready", migrator.ledger().table());
    Ok(())
}
