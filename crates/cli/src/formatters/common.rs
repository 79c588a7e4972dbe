//! Common utilities for formatters.
//!
//! Responsibilities:
//! - Atomic file writing.
//! - Standardized missing/null value handling.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::OutputFormat;

/// String representation for missing values in tables.
pub const DEFAULT_MISSING_VALUE: &str = "N/A";

/// Format an optional string value, using the default missing value if None.
pub fn format_missing(opt: Option<&str>) -> &str {
    opt.unwrap_or(DEFAULT_MISSING_VALUE)
}

/// Print `output` to stdout, or write it to `output_file` when one is given.
pub fn output_result(output: &str, format: OutputFormat, output_file: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = output_file {
        write_to_file(output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!(
            "Results written to {} ({:?} format)",
            path.display(),
            format
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Write formatted output to a file atomically.
///
/// Creates parent directories if needed, writes to a temp file then renames.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temp file")?;
    temp_file.flush().context("Failed to flush temp file")?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}
