use super::*;
use std::fs;

fn global(project_dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.display().to_string(),
        config: None,
        target: None,
    }
}

fn write_project(dir: &Path, database_path: &str) {
    fs::write(
        dir.join("driftwood.yml"),
        format!(
            "name: cli_test\ndatabase:\n  type: duckdb\n  path: \"{database_path}\"\ntargets:\n  scratch:\n    database:\n      type: duckdb\n      path: \":memory:\"\n"
        ),
    )
    .unwrap();
    fs::create_dir_all(dir.join("migrations")).unwrap();
    fs::write(
        dir.join("migrations/001_init.sql"),
        "CREATE TABLE t (id INTEGER);",
    )
    .unwrap();
}

#[test]
fn test_calculate_column_widths() {
    let widths = calculate_column_widths(
        &["MIGRATION", "STATE"],
        &[
            vec!["001_init.sql".to_string(), "applied".to_string()],
            vec!["2.sql".to_string(), "pending".to_string()],
        ],
    );
    assert_eq!(widths, vec![12, 7]);
}

#[test]
fn test_format_timestamp() {
    let ts = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    assert_eq!(format_timestamp(&ts), "1970-01-01 00:00:00 UTC");
}

#[test]
fn test_load_project_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), "app.duckdb");
    let project = load_project(&global(dir.path())).unwrap();
    assert_eq!(project.config.name, "cli_test");
    assert_eq!(project.root, dir.path());
}

#[test]
fn test_load_project_with_explicit_config() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), "app.duckdb");
    let moved = dir.path().join("other.yml");
    fs::rename(dir.path().join("driftwood.yml"), &moved).unwrap();

    assert!(load_project(&global(dir.path())).is_err());

    let mut args = global(dir.path());
    args.config = Some(moved.display().to_string());
    assert_eq!(load_project(&args).unwrap().config.name, "cli_test");
}

#[test]
fn test_unknown_target_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), "app.duckdb");
    let project = load_project(&global(dir.path())).unwrap();
    let err = create_database_connection(&project, Some("prod"))
        .err()
        .unwrap();
    assert!(format!("{err:#}").contains("scratch"));
}

#[tokio::test]
async fn test_build_migrator_uses_project_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), "app.duckdb");

    let migrator = build_migrator(&global(dir.path())).unwrap();
    let report = migrator.apply().await.unwrap();
    assert_eq!(report.applied, vec!["001_init.sql"]);
    drop(migrator);

    assert!(dir.path().join("app.duckdb").exists());
}
