//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Build the final, validated `FleetConfig`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Config file parsing (delegated to file.rs).
//!
//! Invariants / Assumptions:
//! - The intended chain is `from_env()` then `from_file()` then `with_*` overrides,
//!   giving builder > env > file > defaults.
//! - `from_file()` only fills values that are still unset.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::apply_file;
use crate::constants::{APP_NAME, MIN_ENCRYPTION_KEY_LENGTH};
use crate::types::{AgentsConfig, CloudConfig, ElasticsearchAgentConfig, FleetConfig};

/// Configuration loader that builds config from environment variables and files.
#[derive(Default)]
pub struct ConfigLoader {
    cloud_elasticsearch_url: Option<String>,
    agent_hosts: Option<Vec<String>>,
    ca_sha256: Option<String>,
    encryption_key: Option<SecretString>,
    data_dir: Option<PathBuf>,
    preconfigured_outputs_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from `FLEET_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Read configuration from the YAML config file, if a path is set.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_file(&mut self)?;
        Ok(self)
    }

    /// Set the config file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set the cloud Elasticsearch URL.
    pub fn with_cloud_elasticsearch_url(mut self, url: String) -> Self {
        self.cloud_elasticsearch_url = Some(url);
        self
    }

    /// Set the agent Elasticsearch hosts.
    pub fn with_agent_hosts(mut self, hosts: Vec<String>) -> Self {
        self.agent_hosts = Some(hosts);
        self
    }

    /// Set the CA fingerprint for the bootstrapped default output.
    pub fn with_ca_sha256(mut self, fingerprint: String) -> Self {
        self.ca_sha256 = Some(fingerprint);
        self
    }

    /// Set the encryption key.
    pub fn with_encryption_key(mut self, key: String) -> Self {
        self.encryption_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    /// Set the preconfigured outputs file.
    pub fn with_preconfigured_outputs_path(mut self, path: PathBuf) -> Self {
        self.preconfigured_outputs_path = Some(path);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<FleetConfig, ConfigError> {
        let cloud_elasticsearch_url = self
            .cloud_elasticsearch_url
            .as_deref()
            .map(|url| validate_host_url("cloud.elasticsearch_url", url))
            .transpose()?;

        let hosts = self
            .agent_hosts
            .unwrap_or_default()
            .iter()
            .map(|host| validate_host_url("agents.elasticsearch.hosts", host))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(key) = &self.encryption_key
            && key.expose_secret().chars().count() < MIN_ENCRYPTION_KEY_LENGTH
        {
            return Err(ConfigError::EncryptionKeyTooShort {
                min: MIN_ENCRYPTION_KEY_LENGTH,
            });
        }

        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(FleetConfig {
            agents: AgentsConfig {
                elasticsearch: ElasticsearchAgentConfig {
                    hosts,
                    ca_sha256: self.ca_sha256,
                },
            },
            cloud: cloud_elasticsearch_url.map(|url| CloudConfig {
                elasticsearch_url: Some(url),
            }),
            encryption_key: self.encryption_key,
            data_dir,
            preconfigured_outputs_path: self.preconfigured_outputs_path,
        })
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub(crate) fn cloud_elasticsearch_url(&self) -> Option<&String> {
        self.cloud_elasticsearch_url.as_ref()
    }

    pub(crate) fn set_cloud_elasticsearch_url(&mut self, url: Option<String>) {
        self.cloud_elasticsearch_url = url;
    }

    pub(crate) fn agent_hosts(&self) -> Option<&Vec<String>> {
        self.agent_hosts.as_ref()
    }

    pub(crate) fn set_agent_hosts(&mut self, hosts: Option<Vec<String>>) {
        self.agent_hosts = hosts;
    }

    pub(crate) fn ca_sha256(&self) -> Option<&String> {
        self.ca_sha256.as_ref()
    }

    pub(crate) fn set_ca_sha256(&mut self, fingerprint: Option<String>) {
        self.ca_sha256 = fingerprint;
    }

    pub(crate) fn has_encryption_key(&self) -> bool {
        self.encryption_key.is_some()
    }

    pub(crate) fn set_encryption_key(&mut self, key: Option<SecretString>) {
        self.encryption_key = key;
    }

    pub(crate) fn data_dir(&self) -> Option<&PathBuf> {
        self.data_dir.as_ref()
    }

    pub(crate) fn set_data_dir(&mut self, dir: Option<PathBuf>) {
        self.data_dir = dir;
    }

    pub(crate) fn preconfigured_outputs_path(&self) -> Option<&PathBuf> {
        self.preconfigured_outputs_path.as_ref()
    }

    pub(crate) fn set_preconfigured_outputs_path(&mut self, path: Option<PathBuf>) {
        self.preconfigured_outputs_path = path;
    }
}

/// Returns the platform data directory for the output stores.
///
/// - Linux: `~/.local/share/fleet-outputs`
/// - macOS: `~/Library/Application Support/fleet-outputs`
/// - Windows: `%AppData%\fleet-outputs\data`
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ConfigError::DataDirUnavailable("no home directory could be determined".to_string())
        })
}

/// Validate that `raw` is an absolute http(s) URL with a host.
fn validate_host_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: var.to_string(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://localhost:9200): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "host is required (e.g. https://localhost:9200)".to_string(),
        });
    }

    Ok(trimmed.to_string())
}
