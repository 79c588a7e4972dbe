//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide table and JSON renderings of outputs, policies and reports.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings; see `output_result`).
//!
//! Invariants:
//! - Tables use tab-separation for consistent alignment in standard terminals.
//! - JSON output is always valid JSON, including for empty lists (`[]`).
//! - Missing values render as `N/A` in tables and `null` in JSON.

use anyhow::Result;
use fleet_outputs::{AgentPolicy, Output, PreconfigurationReport};

mod common;
mod json;
mod table;

pub use common::output_result;
pub use json::JsonFormatter;
pub use table::TableFormatter;

use crate::args::FormatArg;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
        }
    }
}

/// Renders command results.
pub trait Formatter {
    fn format_outputs(&self, outputs: &[Output]) -> Result<String>;

    fn format_output(&self, output: &Output) -> Result<String>;

    fn format_deleted(&self, id: &str) -> Result<String>;

    fn format_policies(&self, policies: &[AgentPolicy]) -> Result<String>;

    fn format_preconfiguration_report(&self, report: &PreconfigurationReport) -> Result<String>;
}

/// Formatter for `format`.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}
