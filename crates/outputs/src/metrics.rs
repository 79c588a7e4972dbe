//! Metrics collection for output service operations.
//!
//! This module provides metrics collection for output operations, including:
//! - Operation latency histograms
//! - Operation counters by outcome
//! - Error categorization
//! - Default demotion counters
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a recorder in the host process)
//!
//! # Invariants
//! - All metrics use consistent label names: `operation`, `outcome`, `error_category`, `kind`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use std::time::Duration;

use crate::error::{OutputError, StoreError};

/// Metric name for operation duration histogram.
pub const METRIC_OPERATION_DURATION: &str = "fleet_outputs_operation_duration_seconds";

/// Metric name for operation counter.
pub const METRIC_OPERATIONS_TOTAL: &str = "fleet_outputs_operations_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "fleet_outputs_errors_total";

/// Metric name for demotions of a previous default.
pub const METRIC_DEMOTIONS_TOTAL: &str = "fleet_outputs_default_demotions_total";

/// Metric name for agent policies pinned to an explicit data output.
pub const METRIC_POLICIES_PINNED_TOTAL: &str = "fleet_outputs_policies_pinned_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidOutput,
    Unauthorized,
    EncryptionRequired,
    InvalidConfig,
    /// Optimistic concurrency or duplicate id conflicts.
    Conflict,
    Store,
    Policy,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::InvalidOutput => "invalid_output",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::EncryptionRequired => "encryption_required",
            ErrorCategory::InvalidConfig => "invalid_config",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::Store => "store",
            ErrorCategory::Policy => "policy",
        }
    }
}

impl From<&OutputError> for ErrorCategory {
    fn from(error: &OutputError) -> Self {
        match error {
            OutputError::NotFound(_) | OutputError::Store(StoreError::NotFound { .. }) => {
                ErrorCategory::NotFound
            }
            OutputError::InvalidOutput(_) => ErrorCategory::InvalidOutput,
            OutputError::Unauthorized(_) => ErrorCategory::Unauthorized,
            OutputError::EncryptionRequired(_) => ErrorCategory::EncryptionRequired,
            OutputError::InvalidConfigYaml(_) => ErrorCategory::InvalidConfig,
            OutputError::Store(
                StoreError::VersionConflict { .. } | StoreError::AlreadyExists { .. },
            ) => ErrorCategory::Conflict,
            OutputError::Store(_) => ErrorCategory::Store,
            OutputError::Policy(_) => ErrorCategory::Policy,
        }
    }
}

/// Which default flag a demotion cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    Data,
    Monitoring,
}

impl DefaultKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DefaultKind::Data => "data",
            DefaultKind::Monitoring => "monitoring",
        }
    }
}

/// Metrics collector for output service operations.
///
/// A thin wrapper around the `metrics` crate macros with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one completed operation with its duration and outcome.
    pub fn record_operation(
        &self,
        operation: &'static str,
        duration: Duration,
        error: Option<&OutputError>,
    ) {
        if !self.enabled {
            return;
        }

        let outcome = if error.is_some() { "error" } else { "success" };

        metrics::histogram!(METRIC_OPERATION_DURATION,
            "operation" => operation,
            "outcome" => outcome,
        )
        .record(duration.as_secs_f64());

        metrics::counter!(METRIC_OPERATIONS_TOTAL,
            "operation" => operation,
            "outcome" => outcome,
        )
        .increment(1);

        if let Some(error) = error {
            self.record_error(operation, ErrorCategory::from(error));
        }
    }

    /// Record an error.
    pub fn record_error(&self, operation: &'static str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "operation" => operation,
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record that a previous default lost its flag.
    pub fn record_demotion(&self, kind: DefaultKind) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_DEMOTIONS_TOTAL, "kind" => kind.as_str()).increment(1);
    }

    /// Record agent policies pinned to an explicit data output.
    pub fn record_policies_pinned(&self, count: usize) {
        if !self.enabled || count == 0 {
            return;
        }

        metrics::counter!(METRIC_POLICIES_PINNED_TOTAL).increment(count as u64);
    }
}
