//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `FLEET_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Invariants:
//! - Environment variables take precedence over config file settings.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).

use secrecy::SecretString;
use std::path::PathBuf;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Split a comma-separated host list, dropping blank entries.
pub(crate) fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("FLEET_CLOUD_ELASTICSEARCH_URL") {
        loader.set_cloud_elasticsearch_url(Some(url));
    }
    if let Some(hosts) = env_var_or_none("FLEET_AGENTS_ES_HOSTS") {
        let hosts = parse_host_list(&hosts);
        if hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "FLEET_AGENTS_ES_HOSTS".to_string(),
                message: "must contain at least one host".to_string(),
            });
        }
        loader.set_agent_hosts(Some(hosts));
    }
    if let Some(fingerprint) = env_var_or_none("FLEET_AGENTS_ES_CA_SHA256") {
        loader.set_ca_sha256(Some(fingerprint));
    }
    if let Some(key) = env_var_or_none("FLEET_ENCRYPTION_KEY") {
        loader.set_encryption_key(Some(SecretString::new(key.into())));
    }
    if let Some(dir) = env_var_or_none("FLEET_DATA_DIR") {
        loader.set_data_dir(Some(PathBuf::from(dir)));
    }
    if let Some(path) = env_var_or_none("FLEET_PRECONFIGURED_OUTPUTS") {
        loader.set_preconfigured_outputs_path(Some(PathBuf::from(path)));
    }

    // Config path from environment (only if not already set via CLI)
    if loader.config_path().is_none()
        && let Some(config_path) = env_var_or_none("FLEET_CONFIG_PATH")
    {
        loader.set_config_path(Some(PathBuf::from(config_path)));
    }

    Ok(())
}
