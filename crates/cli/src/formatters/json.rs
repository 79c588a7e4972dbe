//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format all result types as pretty-printed JSON.

use anyhow::Result;
use fleet_outputs::{AgentPolicy, Output, PreconfigurationReport};

use super::Formatter;

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_outputs(&self, outputs: &[Output]) -> Result<String> {
        Ok(serde_json::to_string_pretty(outputs)?)
    }

    fn format_output(&self, output: &Output) -> Result<String> {
        Ok(serde_json::to_string_pretty(output)?)
    }

    fn format_deleted(&self, id: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(&serde_json::json!({ "deleted": id }))?)
    }

    fn format_policies(&self, policies: &[AgentPolicy]) -> Result<String> {
        Ok(serde_json::to_string_pretty(policies)?)
    }

    fn format_preconfiguration_report(&self, report: &PreconfigurationReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
