//! Common test utilities for output service integration tests.
//!
//! This module wires an [`OutputService`] to in-memory adapters and exposes
//! the adapters so tests can seed and inspect them directly.
//!
//! # Invariants
//! - Every harness starts with an empty output store.
//! - The configuration never carries a cloud URL unless a test asks for one.
//!
//! # What this does NOT handle
//! - File-backed stores (see `file_store_tests.rs`)
//! - Test-specific assertions or test logic

use std::path::PathBuf;
use std::sync::Arc;

use fleet_config::{AgentsConfig, CloudConfig, ElasticsearchAgentConfig, FleetConfig};
use fleet_outputs::ports::{AuditSink, OutputStore, PolicyRegistry};
use fleet_outputs::{
    AgentPolicy, MemoryOutputStore, MemoryPolicyRegistry, MetricsCollector, OutputService,
    SystemAccess,
};

// Re-export commonly used items for test convenience.
#[allow(unused_imports)]
pub use fleet_outputs::testing::{
    RecordingAuditSink, elasticsearch_output, logstash_output, ssl_config,
};
#[allow(unused_imports)]
pub use fleet_outputs::{
    AuditAction, BulkGetOptions, CreateOptions, DeleteOptions, NewOutput, Output, OutputError,
    OutputField, OutputPatch, OutputType, Patch, UpdateOptions,
};

/// Service plus handles on its adapters.
#[allow(dead_code)]
pub struct Harness {
    pub service: OutputService,
    pub store: Arc<MemoryOutputStore>,
    pub policies: Arc<MemoryPolicyRegistry>,
    pub audit: Arc<RecordingAuditSink>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_policies(Vec::new())
    }

    pub fn with_policies(policies: Vec<AgentPolicy>) -> Self {
        Self::build(policies, test_config(), true)
    }

    /// Harness whose store cannot encrypt secrets.
    pub fn without_encryption() -> Self {
        Self::build(Vec::new(), test_config(), false)
    }

    pub fn with_config(config: FleetConfig) -> Self {
        Self::build(Vec::new(), config, true)
    }

    fn build(policies: Vec<AgentPolicy>, config: FleetConfig, can_encrypt: bool) -> Self {
        let access = SystemAccess::internal();
        let store = Arc::new(MemoryOutputStore::new(&access).with_encryption(can_encrypt));
        let policies = Arc::new(MemoryPolicyRegistry::with_policies(policies));
        let audit = Arc::new(RecordingAuditSink::new());

        let service = OutputService::new(
            store.clone() as Arc<dyn OutputStore>,
            policies.clone() as Arc<dyn PolicyRegistry>,
            audit.clone() as Arc<dyn AuditSink>,
            config,
        )
        .with_metrics(MetricsCollector::disabled());

        Self {
            service,
            store,
            policies,
            audit,
        }
    }

    /// Create an output under a fixed id.
    pub async fn create(&self, id: &str, output: NewOutput) -> Output {
        self.service
            .create(output, CreateOptions::with_id(id))
            .await
            .expect("create output")
    }

    /// Outputs flagged as default and default monitoring, in list order.
    pub async fn default_ids(&self) -> (Vec<String>, Vec<String>) {
        let outputs = self.service.list().await.expect("list outputs").items;
        let defaults = outputs
            .iter()
            .filter(|o| o.is_default)
            .map(|o| o.id.clone())
            .collect();
        let monitoring = outputs
            .iter()
            .filter(|o| o.is_default_monitoring)
            .map(|o| o.id.clone())
            .collect();
        (defaults, monitoring)
    }
}

/// Configuration without cloud settings or data directory side effects.
#[allow(dead_code)]
pub fn test_config() -> FleetConfig {
    FleetConfig {
        agents: AgentsConfig::default(),
        cloud: None,
        encryption_key: None,
        data_dir: PathBuf::from("target/test-data"),
        preconfigured_outputs_path: None,
    }
}

/// Configuration for a hosted deployment with a CA fingerprint.
#[allow(dead_code)]
pub fn cloud_config(url: &str, ca_sha256: &str) -> FleetConfig {
    FleetConfig {
        agents: AgentsConfig {
            elasticsearch: ElasticsearchAgentConfig {
                hosts: Vec::new(),
                ca_sha256: Some(ca_sha256.to_string()),
            },
        },
        cloud: Some(CloudConfig {
            elasticsearch_url: Some(url.to_string()),
        }),
        ..test_config()
    }
}

/// Policy running the Fleet Server integration.
#[allow(dead_code)]
pub fn fleet_server_policy(id: &str) -> AgentPolicy {
    AgentPolicy::new(id, format!("Fleet Server {id}")).with_package("fleet_server")
}

/// Policy running the APM integration.
#[allow(dead_code)]
pub fn apm_policy(id: &str) -> AgentPolicy {
    AgentPolicy::new(id, format!("APM {id}")).with_package("apm")
}
