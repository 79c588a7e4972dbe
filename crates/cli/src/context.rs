//! Command context wiring the output service to its file-backed adapters.
//!
//! Responsibilities:
//! - Create the data directory and open the output and policy stores.
//! - Build the `OutputService` shared by every command.
//!
//! Does NOT handle:
//! - Configuration loading (done in `main()`).
//!
//! Invariants:
//! - Output secrets are encrypted at rest whenever an encryption key is configured.

use std::sync::Arc;

use anyhow::{Context, Result};
use fleet_config::FleetConfig;
use fleet_outputs::{
    FileOutputStore, FilePolicyRegistry, OutputService, SystemAccess, TracingAuditSink,
};

/// Everything a command needs to run.
pub(crate) struct CommandContext {
    pub(crate) service: OutputService,
    pub(crate) policies: Arc<FilePolicyRegistry>,
    pub(crate) config: FleetConfig,
}

impl CommandContext {
    /// Open the stores under `config.data_dir`.
    pub(crate) fn open(config: FleetConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                config.data_dir.display()
            )
        })?;

        let access = SystemAccess::internal();
        let store = FileOutputStore::open(
            config.outputs_store_path(),
            config.encryption_key.as_ref(),
            &access,
        )
        .context("Failed to open output store")?;
        let policies = Arc::new(
            FilePolicyRegistry::open(config.policies_store_path())
                .context("Failed to open agent policy store")?,
        );

        let service = OutputService::new(
            Arc::new(store),
            policies.clone(),
            Arc::new(TracingAuditSink),
            config.clone(),
        );

        Ok(Self {
            service,
            policies,
            config,
        })
    }
}
