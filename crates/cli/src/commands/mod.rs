//! CLI command implementations.

pub mod outputs;
pub mod policies;
pub mod preconfigure;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::formatters::{OutputFormat, get_formatter, output_result};

/// Parse a YAML (or JSON) document from `path`.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Where and how a command writes its result.
#[derive(Debug, Clone)]
pub struct Render {
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

impl Render {
    /// Format with the selected formatter and emit the result.
    pub(crate) fn emit(
        &self,
        format: impl FnOnce(&dyn crate::formatters::Formatter) -> Result<String>,
    ) -> Result<()> {
        let formatter = get_formatter(self.format);
        let output = format(formatter.as_ref())?;
        output_result(&output, self.format, self.output_file.as_ref())
    }
}
