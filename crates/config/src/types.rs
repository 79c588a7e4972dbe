//! Configuration type definitions for the Fleet output manager.
//!
//! Responsibilities:
//! - Define the resolved runtime configuration (`FleetConfig`).
//! - Define the serde shapes shared by the YAML config file and the runtime config.
//!
//! Does NOT handle:
//! - Loading from files or environment variables (see `loader` module).
//! - Encrypting secrets (see `encryption` module).
//!
//! Invariants:
//! - The encryption key is always held as a `SecretString` and never logged.
//! - Host lists are validated absolute http(s) URLs once a `FleetConfig` exists.

use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ES_HOSTS, OUTPUTS_FILE_NAME, POLICIES_FILE_NAME};

/// Elasticsearch connection hints handed to agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchAgentConfig {
    /// Hosts agents should ship to when no cloud URL is known.
    pub hosts: Vec<String>,
    /// CA fingerprint attached to the bootstrapped default output.
    pub ca_sha256: Option<String>,
}

/// Agent-facing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub elasticsearch: ElasticsearchAgentConfig,
}

/// Settings supplied by a hosted (cloud) deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Public Elasticsearch endpoint of the deployment.
    pub elasticsearch_url: Option<String>,
}

/// Resolved configuration for the output manager.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    pub agents: AgentsConfig,
    pub cloud: Option<CloudConfig>,
    /// Key used to encrypt output secrets at rest. `None` disables encryption.
    pub encryption_key: Option<SecretString>,
    /// Directory holding the output and policy stores.
    pub data_dir: PathBuf,
    /// YAML file listing outputs declared in static configuration.
    pub preconfigured_outputs_path: Option<PathBuf>,
}

impl FleetConfig {
    /// Cloud Elasticsearch URL, if the deployment provides one.
    pub fn cloud_elasticsearch_url(&self) -> Option<&str> {
        self.cloud
            .as_ref()
            .and_then(|cloud| cloud.elasticsearch_url.as_deref())
    }

    /// Whether secrets can be encrypted before they are persisted.
    pub fn can_encrypt(&self) -> bool {
        self.encryption_key.is_some()
    }

    /// Elasticsearch hosts for a freshly bootstrapped default output.
    ///
    /// Cloud URL first, then configured agent hosts, then the localhost fallback.
    pub fn default_es_hosts(&self) -> Vec<String> {
        if let Some(url) = self.cloud_elasticsearch_url() {
            return vec![url.to_string()];
        }
        if !self.agents.elasticsearch.hosts.is_empty() {
            return self.agents.elasticsearch.hosts.clone();
        }
        DEFAULT_ES_HOSTS.iter().map(|h| h.to_string()).collect()
    }

    /// Path of the JSON output store.
    pub fn outputs_store_path(&self) -> PathBuf {
        self.data_dir.join(OUTPUTS_FILE_NAME)
    }

    /// Path of the JSON agent policy store.
    pub fn policies_store_path(&self) -> PathBuf {
        self.data_dir.join(POLICIES_FILE_NAME)
    }
}

mod optional_secret {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}

/// On-disk shape of the YAML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigFile {
    pub agents: Option<AgentsConfig>,
    pub cloud: Option<CloudConfig>,
    #[serde(deserialize_with = "optional_secret::deserialize")]
    pub encryption_key: Option<SecretString>,
    pub data_dir: Option<PathBuf>,
    pub preconfigured_outputs_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FleetConfig {
        FleetConfig {
            agents: AgentsConfig::default(),
            cloud: None,
            encryption_key: None,
            data_dir: PathBuf::from("/tmp/fleet"),
            preconfigured_outputs_path: None,
        }
    }

    #[test]
    fn test_default_es_hosts_falls_back_to_localhost() {
        assert_eq!(config().default_es_hosts(), vec!["http://localhost:9200"]);
    }

    #[test]
    fn test_default_es_hosts_prefers_configured_hosts() {
        let mut config = config();
        config.agents.elasticsearch.hosts = vec!["https://es.internal:9200".to_string()];
        assert_eq!(config.default_es_hosts(), vec!["https://es.internal:9200"]);
    }

    #[test]
    fn test_default_es_hosts_prefers_cloud_url() {
        let mut config = config();
        config.agents.elasticsearch.hosts = vec!["https://es.internal:9200".to_string()];
        config.cloud = Some(CloudConfig {
            elasticsearch_url: Some("https://cloud.example.com:443".to_string()),
        });
        assert_eq!(
            config.default_es_hosts(),
            vec!["https://cloud.example.com:443"]
        );
    }

    #[test]
    fn test_store_paths_live_in_data_dir() {
        let config = config();
        assert_eq!(
            config.outputs_store_path(),
            PathBuf::from("/tmp/fleet/outputs.json")
        );
        assert_eq!(
            config.policies_store_path(),
            PathBuf::from("/tmp/fleet/agent_policies.json")
        );
    }
}
