//! Audit records for output access and mutation.

use chrono::{DateTime, Utc};
use fleet_config::constants::OUTPUT_SAVED_OBJECT_TYPE;
use serde::Serialize;

use crate::ports::AuditSink;

/// Tracing target for audit events.
pub const AUDIT_TARGET: &str = "fleet::audit";

/// Kind of access being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Get,
    Update,
    Delete,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One audited access to a saved object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub id: String,
    pub saved_object_type: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Entry for an output record, stamped now.
    pub fn output(action: AuditAction, id: impl Into<String>) -> Self {
        Self {
            action,
            id: id.into(),
            saved_object_type: OUTPUT_SAVED_OBJECT_TYPE,
            timestamp: Utc::now(),
        }
    }
}

/// Writes audit entries as structured `tracing` events on [`AUDIT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        tracing::info!(
            target: AUDIT_TARGET,
            action = entry.action.as_str(),
            id = %entry.id,
            saved_object_type = entry.saved_object_type,
            timestamp = %entry.timestamp.to_rfc3339(),
            "saved object accessed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_entry() {
        let entry = AuditEntry::output(AuditAction::Delete, "abc");
        assert_eq!(entry.action.as_str(), "delete");
        assert_eq!(entry.saved_object_type, "ingest-outputs");
        assert!(entry.timestamp <= Utc::now());
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingAuditSink.record(AuditEntry::output(AuditAction::Get, "abc"));
    }
}
