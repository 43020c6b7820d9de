//! Apply command implementation

use anyhow::{Context, Result};
use dw_core::MigrationId;
use dw_migrate::{ApplyOptions, Migrator};

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::build_migrator;

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global)?;

    let target = match &args.to {
        Some(to) => Some(MigrationId::try_new(to.as_str()).context("--to must not be empty")?),
        None => None,
    };

    let mut options = migrator.default_apply_options();
    options.target = target;
    options.verify_checksums |= args.verify_checksums;

    if args.dry_run {
        return print_plan(&migrator, &options).await;
    }

    let report = migrator
        .apply_with(&options)
        .await
        .context("Apply failed")?;

    for id in &report.applied {
        println!("  applied  {id}");
    }
    println!(
        "\nApplied {} migration(s), {} already up to date",
        report.applied.len(),
        report.skipped
    );
    Ok(())
}

/// Print the units `apply` would run, without running them.
///
/// Fails the same way `apply` would on an unknown target or a checksum
/// mismatch.
async fn print_plan(migrator: &Migrator, options: &ApplyOptions) -> Result<()> {
    let plan = migrator.plan().await.context("Failed to compute plan")?;
    let pending = plan.pending_through(options.target.as_ref())?;
    if options.verify_checksums {
        migrator
            .verify_applied(&plan)
            .context("Checksum verification failed")?;
    }

    if pending.is_empty() {
        println!("Nothing to apply ({} already applied)", plan.skipped());
        return Ok(());
    }

    println!("Would apply {} migration(s):", pending.len());
    for id in pending {
        println!("  {id}");
    }
    Ok(())
}
