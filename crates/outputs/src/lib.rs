//! Fleet output configuration management.
//!
//! This crate owns the named output configurations agents ship data to and
//! keeps the cluster-wide invariants around them: one default output, one
//! default monitoring output, no Logstash output behind APM or Fleet Server
//! policies, and locked fields on preconfigured outputs.

pub mod audit;
pub mod error;
pub mod hosts;
pub mod ids;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod ports;
pub mod preconfiguration;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use audit::{AuditAction, AuditEntry, TracingAuditSink};
pub use error::{OutputError, PolicyError, Result, StoreError};
pub use hosts::normalize_host_for_agents;
pub use ids::{is_canonical_id, output_id_to_uuid};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    AgentPolicy, ListResult, NewOutput, Output, OutputAttributes, OutputField, OutputPatch,
    OutputType, Patch, PolicyFilter, SavedOutput, ShipperConfig, SslConfig,
};
pub use policy::{FilePolicyRegistry, MemoryPolicyRegistry};
pub use ports::{AuditSink, OutputQuery, OutputStore, PolicyRegistry, SystemAccess};
pub use preconfiguration::{
    PreconfigurationError, PreconfigurationReport, PreconfiguredOutput,
    ensure_preconfigured_outputs, load_preconfigured_outputs,
};
pub use service::{BulkGetOptions, CreateOptions, DeleteOptions, OutputService, UpdateOptions};
pub use store::{FileOutputStore, MemoryOutputStore};
