//! Integration tests for structured exit codes.
//!
//! These tests verify that fleet-outputs returns the correct exit codes
//! for different error scenarios, enabling reliable shell scripting.

mod common;

use common::{fleet_cmd, json_output};
use predicates::prelude::*;
use tempfile::TempDir;

fn create_es(dir: &std::path::Path, id: &str, extra: &[&str]) {
    let mut args = vec![
        "create",
        "--id",
        id,
        "--name",
        id,
        "--type",
        "elasticsearch",
        "--host",
        "http://es:9200",
    ];
    args.extend_from_slice(extra);
    json_output(dir, &args);
}

/// Test that successful commands return exit code 0.
#[test]
fn test_success_returns_exit_code_0() {
    let dir = TempDir::new().unwrap();
    fleet_cmd(dir.path()).arg("list").assert().code(0);
}

/// Test that missing outputs return exit code 4.
#[test]
fn test_not_found_returns_exit_code_4() {
    let dir = TempDir::new().unwrap();
    fleet_cmd(dir.path())
        .args(["get", "ghost"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Output ghost not found"));
}

/// Test that invalid payloads return exit code 5.
#[test]
fn test_validation_error_returns_exit_code_5() {
    let dir = TempDir::new().unwrap();
    let yaml = dir.path().join("bad.yml");
    std::fs::write(&yaml, "shipper: [unclosed").unwrap();

    fleet_cmd(dir.path())
        .args([
            "create",
            "--name",
            "bad",
            "--type",
            "elasticsearch",
            "--host",
            "http://es:9200",
            "--config-yaml-file",
            yaml.to_str().unwrap(),
        ])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid config_yaml"));
}

/// Test that Logstash without an encryption key returns exit code 5.
#[test]
fn test_logstash_without_key_returns_exit_code_5() {
    let dir = TempDir::new().unwrap();
    fleet_cmd(dir.path())
        .env_remove("FLEET_ENCRYPTION_KEY")
        .args([
            "create",
            "--name",
            "ls",
            "--type",
            "logstash",
            "--host",
            "logstash:5044",
        ])
        .assert()
        .code(5);
}

/// Test that deleting the default output returns exit code 6.
#[test]
fn test_protected_delete_returns_exit_code_6() {
    let dir = TempDir::new().unwrap();
    create_es(dir.path(), "main", &["--default"]);

    fleet_cmd(dir.path())
        .args(["delete", "main"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("cannot be deleted"));

    create_es(dir.path(), "other", &["--default"]);
    fleet_cmd(dir.path()).args(["delete", "main"]).assert().code(0);
}

/// Test that duplicate ids return exit code 7.
#[test]
fn test_conflict_returns_exit_code_7() {
    let dir = TempDir::new().unwrap();
    create_es(dir.path(), "dup", &[]);

    fleet_cmd(dir.path())
        .args([
            "create",
            "--id",
            "dup",
            "--name",
            "dup",
            "--type",
            "elasticsearch",
            "--host",
            "http://es:9200",
        ])
        .assert()
        .code(7);
}

/// Test that configuration errors return exit code 1.
#[test]
fn test_invalid_config_returns_exit_code_1() {
    let dir = TempDir::new().unwrap();
    fleet_cmd(dir.path())
        .env("FLEET_ENCRYPTION_KEY", "short")
        .arg("list")
        .assert()
        .code(1);
}
