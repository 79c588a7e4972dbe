//! Agent policy commands.

use anyhow::{Context, Result};
use fleet_outputs::ports::PolicyRegistry;
use fleet_outputs::{AgentPolicy, PolicyFilter, output_id_to_uuid};
use tracing::info;

use super::Render;
use crate::args::PoliciesCommand;
use crate::context::CommandContext;

pub async fn run(ctx: &CommandContext, command: PoliciesCommand, render: &Render) -> Result<()> {
    match command {
        PoliciesCommand::List => {
            let policies = ctx
                .policies
                .list_policies(PolicyFilter::All)
                .await
                .context("Failed to list agent policies")?;
            render.emit(|f| f.format_policies(&policies))
        }
        PoliciesCommand::Add {
            id,
            name,
            data_output,
            monitoring_output,
            packages,
            managed,
        } => {
            let mut policy = AgentPolicy::new(id.clone(), name.unwrap_or_else(|| id.clone()));
            policy.data_output_id = data_output.as_deref().map(output_id_to_uuid);
            policy.monitoring_output_id = monitoring_output.as_deref().map(output_id_to_uuid);
            policy.package_policies = packages;
            policy.is_managed = managed;

            info!(id = %id, "Adding agent policy");
            ctx.policies
                .insert(policy.clone())
                .await
                .with_context(|| format!("Failed to add agent policy {id}"))?;
            render.emit(|f| f.format_policies(std::slice::from_ref(&policy)))
        }
    }
}
