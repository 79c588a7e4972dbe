//! Tests for the configuration loader builder.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Every variable the loader reads, unset.
pub fn cleared_fleet_vars() -> Vec<(&'static str, Option<String>)> {
    vec![
        ("FLEET_CLOUD_ELASTICSEARCH_URL", None),
        ("FLEET_AGENTS_ES_HOSTS", None),
        ("FLEET_AGENTS_ES_CA_SHA256", None),
        ("FLEET_ENCRYPTION_KEY", None),
        ("FLEET_DATA_DIR", None),
        ("FLEET_PRECONFIGURED_OUTPUTS", None),
        ("FLEET_CONFIG_PATH", None),
    ]
}

/// `cleared_fleet_vars()` with the given overrides applied.
pub fn fleet_vars(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
    let mut vars = cleared_fleet_vars();
    for (key, value) in overrides {
        if let Some(slot) = vars.iter_mut().find(|(k, _)| k == key) {
            slot.1 = Some((*value).to_string());
        }
    }
    vars
}
