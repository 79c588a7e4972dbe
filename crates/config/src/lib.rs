//! Configuration management for the Fleet output manager.
//!
//! This crate provides the environment-derived settings the output service
//! depends on (cloud Elasticsearch URL, agent host defaults, CA fingerprint,
//! encryption key) and the helpers used to protect secrets at rest.

pub mod constants;
pub mod encryption;
mod loader;
pub mod types;

pub use encryption::{EncryptionError, Encryptor, SecretCipher};
pub use loader::{ConfigError, ConfigLoader, default_data_dir, env_var_or_none};
pub use types::{AgentsConfig, CloudConfig, ElasticsearchAgentConfig, FleetConfig};
