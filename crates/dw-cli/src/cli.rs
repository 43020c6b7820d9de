//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Driftwood - apply ordered SQL migrations and track them in a ledger table
#[derive(Parser, Debug)]
#[command(name = "dw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Named target from the config (falls back to DW_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the ledger table if it does not exist
    Init(InitArgs),

    /// Apply pending migrations in order
    Apply(ApplyArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Remove the most recent ledger entries (schema is not reverted)
    Rollback(RollbackArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Apply up to and including this migration
    #[arg(long, value_name = "ID")]
    pub to: Option<String>,

    /// Print the pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Refuse to run if an applied migration changed on disk
    #[arg(long)]
    pub verify_checksums: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON report
    Json,
}

/// Arguments for the rollback command
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Number of ledger entries to remove, most recent first
    #[arg(short, long, default_value_t = 1)]
    pub steps: usize,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
