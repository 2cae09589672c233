//! CLI end-to-end tests
//!
//! Tests for the kinsearch command-line interface. All searches run against
//! the offline demo provider.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the kinsearch binary
#[allow(deprecated)]
fn kinsearch_cmd() -> Command {
    Command::cargo_bin("kinsearch").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = kinsearch_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = kinsearch_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kinsearch"));
}

#[test]
fn test_cli_providers_lists_demo() {
    let mut cmd = kinsearch_cmd();
    cmd.arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo\tDemo"));
}

#[test]
fn test_cli_search_demo_text() {
    let mut cmd = kinsearch_cmd();
    cmd.args(["search", "Karl", "--provider", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Karl XII"))
        .stdout(predicate::str::contains("1682–1718"))
        .stdout(predicate::str::contains("3 match(es)"));
}

#[test]
fn test_cli_search_demo_json() {
    let mut cmd = kinsearch_cmd();
    let output = cmd
        .args(["search", "Karl", "--provider", "auto", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["birthYear"], 1682);
    assert_eq!(items[0]["source"], "Demo");
}

#[test]
fn test_cli_search_short_query_is_empty() {
    let mut cmd = kinsearch_cmd();
    cmd.args(["search", "K", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_cli_refine_demo() {
    let mut cmd = kinsearch_cmd();
    cmd.args(["refine", "--name", "Karl", "--place", "karlstad", "--provider", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Karlsson, Anna"))
        .stdout(predicate::str::contains("1 match(es)"));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("kinsearch.toml");
    fs::write(
        &config_path,
        r#"
[search]
max_results = 20

[archive]
enabled = true
base_url = "https://archive.example/api"
"#,
    )
    .unwrap();

    let mut cmd = kinsearch_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("Providers: 2"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("kinsearch.toml");
    fs::write(&config_path, "[search]\ntimeout_secs = 60\n").unwrap();

    let mut cmd = kinsearch_cmd();
    cmd.arg("validate").arg(&config_path).assert().failure();
}

#[test]
fn test_cli_unreachable_archive_reports_code() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("kinsearch.toml");
    fs::write(
        &config_path,
        r#"
[search]
timeout_secs = 5

[archive]
enabled = true
base_url = "http://127.0.0.1:9"
"#,
    )
    .unwrap();

    let mut cmd = kinsearch_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["search", "Karl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NETWORK_OR_TIMEOUT"));
}
