//! CLI tests for the `tx` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `tx` isolated from any user config and log directory
fn tx(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tx").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

#[test]
fn test_config_prints_defaults() {
    let home = TempDir::new().unwrap();
    tx(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max-concurrent-coordinations: 10"))
        .stdout(predicate::str::contains("max-sequence-level: 9"));
}

#[test]
fn test_config_reads_local_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".triaxis.yml"),
        "coordinator:\n  max-concurrent-coordinations: 4\n",
    )
    .unwrap();

    tx(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max-concurrent-coordinations: 4"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    tx(&home)
        .args(["--config", "nope.yml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_axis_sequence_json() {
    let home = TempDir::new().unwrap();
    tx(&home)
        .args(["axis", "sequence", "E1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"level\": 2"));
}

#[test]
fn test_axis_rejects_unknown_name() {
    let home = TempDir::new().unwrap();
    tx(&home)
        .args(["axis", "gravity", "E1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown axis"));
}

#[test]
fn test_run_reports_completed_sessions() {
    let home = TempDir::new().unwrap();
    tx(&home)
        .args(["run", "-n", "2", "--entity", "E", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_completed\": 2"))
        .stdout(predicate::str::contains("coordination_completed"));
}

#[test]
fn test_run_over_capacity_reports_rejections() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".triaxis.yml"),
        "coordinator:\n  max-concurrent-coordinations: 1\n",
    )
    .unwrap();

    tx(&home)
        .args(["run", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stats"));
}
