//! Status command implementation

use anyhow::{Context, Result};
use dw_migrate::StatusReport;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{build_migrator, format_timestamp, print_table};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global)?;
    let report = migrator.status().await.context("Failed to read status")?;

    match args.output {
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize status report")?;
            println!("{json}");
        }
        StatusOutput::Table => print_status_table(&report),
    }
    Ok(())
}

fn status_rows(report: &StatusReport) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = report
        .units
        .iter()
        .map(|unit| {
            let (state, executed_at) = match &unit.executed_at {
                Some(ts) => ("applied", format_timestamp(ts)),
                None => ("pending", "-".to_string()),
            };
            vec![
                unit.identifier.to_string(),
                state.to_string(),
                executed_at,
                unit.drift.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    rows.extend(report.orphaned.iter().map(|entry| {
        vec![
            entry.identifier.to_string(),
            "orphaned".to_string(),
            format_timestamp(&entry.executed_at),
            "-".to_string(),
        ]
    }));
    rows
}

fn print_status_table(report: &StatusReport) {
    if report.units.is_empty() && report.orphaned.is_empty() {
        println!("No migrations found.");
        return;
    }

    print_table(
        &["MIGRATION", "STATE", "EXECUTED AT", "DRIFT"],
        &status_rows(report),
    );
    println!(
        "\n{} applied, {} pending, {} orphaned",
        report.executed_count(),
        report.pending_count(),
        report.orphaned.len()
    );
}
