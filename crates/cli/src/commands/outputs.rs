//! Output commands: list, get, create, update, delete and ensure-default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fleet_outputs::{CreateOptions, DeleteOptions, NewOutput, OutputPatch, UpdateOptions};
use tracing::info;

use super::{Render, read_document};
use crate::args::OutputFields;
use crate::context::CommandContext;

pub async fn list(ctx: &CommandContext, proxy_id: Option<String>, render: &Render) -> Result<()> {
    let outputs = match &proxy_id {
        Some(proxy_id) => {
            info!(proxy_id = %proxy_id, "Listing outputs for proxy");
            ctx.service.list_all_for_proxy_id(proxy_id).await
        }
        None => {
            info!("Listing outputs");
            ctx.service.list().await
        }
    }
    .context("Failed to list outputs")?;

    render.emit(|f| f.format_outputs(&outputs.items))
}

pub async fn get(ctx: &CommandContext, id: &str, render: &Render) -> Result<()> {
    let output = ctx
        .service
        .get(id)
        .await
        .with_context(|| format!("Failed to get output {id}"))?;

    render.emit(|f| f.format_output(&output))
}

pub async fn create(
    ctx: &CommandContext,
    id: Option<String>,
    overwrite: bool,
    file: Option<PathBuf>,
    fields: OutputFields,
    render: &Render,
) -> Result<()> {
    let output: NewOutput = match file {
        Some(path) => read_document(&path)?,
        None => fields.into_new_output()?,
    };
    info!(name = %output.name, output_type = %output.output_type, "Creating output");

    let created = ctx
        .service
        .create(
            output,
            CreateOptions {
                id,
                overwrite,
                ..CreateOptions::default()
            },
        )
        .await
        .context("Failed to create output")?;

    render.emit(|f| f.format_output(&created))
}

pub async fn update(
    ctx: &CommandContext,
    id: &str,
    file: Option<PathBuf>,
    fields: OutputFields,
    render: &Render,
) -> Result<()> {
    let patch: OutputPatch = match file {
        Some(path) => read_document(&path)?,
        None => fields.into_patch()?,
    };
    if patch.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one field flag or --file");
    }
    info!(id = %id, "Updating output");

    ctx.service
        .update(id, patch, UpdateOptions::default())
        .await
        .with_context(|| format!("Failed to update output {id}"))?;
    let updated = ctx.service.get(id).await?;

    render.emit(|f| f.format_output(&updated))
}

pub async fn delete(ctx: &CommandContext, id: &str, render: &Render) -> Result<()> {
    info!(id = %id, "Deleting output");
    ctx.service
        .delete(id, DeleteOptions::default())
        .await
        .with_context(|| format!("Failed to delete output {id}"))?;

    render.emit(|f| f.format_deleted(id))
}

pub async fn ensure_default(ctx: &CommandContext, render: &Render) -> Result<()> {
    let output = ctx
        .service
        .ensure_default_output()
        .await
        .context("Failed to ensure the default output")?;

    render.emit(|f| f.format_output(&output))
}
