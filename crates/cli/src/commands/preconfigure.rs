//! Preconfigure command: apply outputs declared in static configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fleet_outputs::{ensure_preconfigured_outputs, load_preconfigured_outputs};
use tracing::info;

use super::Render;
use crate::context::CommandContext;

pub async fn run(ctx: &CommandContext, file: Option<PathBuf>, render: &Render) -> Result<()> {
    let path = file
        .or_else(|| ctx.config.preconfigured_outputs_path.clone())
        .context(
            "No preconfiguration file: pass --file or set FLEET_PRECONFIGURED_OUTPUTS",
        )?;

    let outputs = load_preconfigured_outputs(&path)?;
    info!(path = %path.display(), outputs = outputs.len(), "Applying preconfigured outputs");

    let report = ensure_preconfigured_outputs(&ctx.service, &outputs).await?;

    render.emit(|f| f.format_preconfiguration_report(&report))
}
