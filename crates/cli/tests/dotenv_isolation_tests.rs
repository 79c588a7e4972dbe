//! Tests that `.env` loading can be disabled and that malformed files do not leak values.

mod common;

use common::fleet_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_dotenv_disabled_ignores_env_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "FLEET_ENCRYPTION_KEY=short\n",
    )
    .unwrap();

    fleet_cmd(dir.path())
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success();
}

#[test]
fn test_malformed_env_file_does_not_leak_contents() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "THIS IS NOT VALID super-secret-value\n").unwrap();

    fleet_cmd(dir.path())
        .current_dir(dir.path())
        .env_remove("DOTENV_DISABLED")
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("super-secret-value").not());
}
