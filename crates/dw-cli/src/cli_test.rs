use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn rollback_defaults_to_one_step() {
    let cli = Cli::parse_from(["dw", "rollback"]);
    match cli.command {
        Commands::Rollback(args) => assert_eq!(args.steps, 1),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn apply_flags_parse() {
    let cli = Cli::parse_from([
        "dw",
        "-p",
        "proj",
        "apply",
        "--to",
        "002_add_users.sql",
        "--dry-run",
        "--verify-checksums",
    ]);
    assert_eq!(cli.global.project_dir, "proj");
    match cli.command {
        Commands::Apply(args) => {
            assert_eq!(args.to.as_deref(), Some("002_add_users.sql"));
            assert!(args.dry_run);
            assert!(args.verify_checksums);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::parse_from(["dw", "status", "-o", "json", "--target", "prod", "-v"]);
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    assert!(cli.global.verbose);
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn rollback_rejects_non_numeric_steps() {
    assert!(Cli::try_parse_from(["dw", "rollback", "--steps", "many"]).is_err());
}
