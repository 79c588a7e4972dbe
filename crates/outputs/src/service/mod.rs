//! The output configuration service.
//!
//! Responsibilities:
//! - Create, update, delete and read outputs through an [`OutputStore`].
//! - Keep at most one default output and one default monitoring output.
//! - Keep Logstash outputs away from APM and Fleet Server policies.
//! - Protect preconfigured outputs from runtime edits outside `allow_edit`.
//!
//! Does NOT handle:
//! - Request validation or HTTP status mapping (see `OutputError::status_code`).
//! - Retrying store conflicts; they reach the caller unchanged.
//!
//! Invariants / Assumptions:
//! - Demotion of a previous default happens before the new default is written,
//!   and is a single nested update that never demotes further.
//! - The demotion write is guarded by the version read when the previous
//!   default was looked up.
//! - Concurrent mutations are not serialized here; two callers that both see
//!   *no* default may each create one.

mod create;
mod defaults;
mod delete;
mod reads;
mod update;
pub(crate) mod validation;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use fleet_config::FleetConfig;
use tracing::{Instrument, info_span};

use crate::audit::{AuditAction, AuditEntry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::ports::{AuditSink, OutputStore, PolicyRegistry};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options for [`OutputService::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Caller-chosen id; canonicalised before use. A random id is generated when absent.
    pub id: Option<String>,
    /// The output comes from static configuration.
    pub from_preconfiguration: bool,
    /// Replace an existing output with the same id.
    pub overwrite: bool,
}

impl CreateOptions {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Options for [`OutputService::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// The change comes from static configuration; bypasses preconfiguration locks.
    pub from_preconfiguration: bool,
}

/// Options for [`OutputService::delete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// The deletion comes from static configuration; bypasses protection checks.
    pub from_preconfiguration: bool,
}

/// Options for [`OutputService::bulk_get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkGetOptions {
    /// Drop ids that do not exist instead of failing the batch.
    pub ignore_not_found: bool,
}

impl Default for BulkGetOptions {
    fn default() -> Self {
        Self {
            ignore_not_found: true,
        }
    }
}

/// Manages output configurations and their cluster-wide invariants.
///
/// Built once with its collaborators and shared by reference.
pub struct OutputService {
    store: Arc<dyn OutputStore>,
    policies: Arc<dyn PolicyRegistry>,
    audit: Arc<dyn AuditSink>,
    config: FleetConfig,
    metrics: MetricsCollector,
}

impl OutputService {
    pub fn new(
        store: Arc<dyn OutputStore>,
        policies: Arc<dyn PolicyRegistry>,
        audit: Arc<dyn AuditSink>,
        config: FleetConfig,
    ) -> Self {
        Self {
            store,
            policies,
            audit,
            config,
            metrics: MetricsCollector::new(),
        }
    }

    /// Replace the metrics collector.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn policies(&self) -> &Arc<dyn PolicyRegistry> {
        &self.policies
    }

    fn audit(&self, action: AuditAction, id: &str) {
        self.audit.record(AuditEntry::output(action, id));
    }

    /// Run one public operation inside a span and record its metrics.
    async fn observe<T>(
        &self,
        operation: &'static str,
        output_id: Option<&str>,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        let span = info_span!(
            "outputs.operation",
            operation,
            output_id = output_id.unwrap_or_default(),
            duration_ms = tracing::field::Empty,
        );

        let result = fut.instrument(span.clone()).await;

        let elapsed = start.elapsed();
        span.record("duration_ms", elapsed.as_millis() as i64);
        if let Err(e) = &result {
            tracing::debug!(parent: &span, error = %e, "output operation failed");
        }
        self.metrics
            .record_operation(operation, elapsed, result.as_ref().err());
        result
    }
}
