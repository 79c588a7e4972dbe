//! Shared test utilities for fleet-outputs CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point every command at a private data directory.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - `FLEET_ENCRYPTION_KEY` is set so Logstash outputs can be created.

use std::path::Path;

use assert_cmd::Command;

/// Encryption key used by hermetic commands.
#[allow(dead_code)]
pub const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Returns a hermetic `fleet-outputs` command storing its data in `data_dir`.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Other `FLEET_*` variables are cleared to ensure no leakage from the host.
pub fn fleet_cmd(data_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fleet-outputs");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("FLEET_DATA_DIR", data_dir);
    cmd.env("FLEET_ENCRYPTION_KEY", TEST_KEY);

    cmd.env_remove("FLEET_CLOUD_ELASTICSEARCH_URL")
        .env_remove("FLEET_AGENTS_ES_HOSTS")
        .env_remove("FLEET_AGENTS_ES_CA_SHA256")
        .env_remove("FLEET_PRECONFIGURED_OUTPUTS")
        .env_remove("FLEET_CONFIG_PATH")
        .env_remove("RUST_LOG");

    cmd
}

/// Run `args` and parse stdout as JSON.
#[allow(dead_code)]
pub fn json_output(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = fleet_cmd(data_dir)
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("run fleet-outputs");
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}
