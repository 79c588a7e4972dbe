//! Config file loading.
//!
//! Responsibilities:
//! - Read the YAML config file named by the loader.
//! - Apply file values that no other source has set yet.
//!
//! Does NOT handle:
//! - Environment variable parsing (see env.rs).
//! - Validation of the final values (see builder.rs).

use std::path::Path;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::ConfigFile;

/// Parse a YAML config file.
pub(crate) fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        kind: e.kind(),
    })?;

    // An empty document is a valid, empty config.
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content).map_err(|e| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply the config file to the loader, if one is configured.
pub fn apply_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let Some(path) = loader.config_path().cloned() else {
        return Ok(());
    };

    let file = read_config_file(&path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");

    if let Some(agents) = file.agents {
        if loader.agent_hosts().is_none() && !agents.elasticsearch.hosts.is_empty() {
            loader.set_agent_hosts(Some(agents.elasticsearch.hosts));
        }
        if loader.ca_sha256().is_none() {
            loader.set_ca_sha256(agents.elasticsearch.ca_sha256);
        }
    }
    if let Some(cloud) = file.cloud
        && loader.cloud_elasticsearch_url().is_none()
    {
        loader.set_cloud_elasticsearch_url(cloud.elasticsearch_url);
    }
    if !loader.has_encryption_key() {
        loader.set_encryption_key(file.encryption_key);
    }
    if loader.data_dir().is_none() {
        loader.set_data_dir(file.data_dir);
    }
    if loader.preconfigured_outputs_path().is_none() {
        loader.set_preconfigured_outputs_path(file.preconfigured_outputs_path);
    }

    Ok(())
}
