//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands::{self, Render};
use crate::context::CommandContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli, ctx: &CommandContext) -> Result<()> {
    let render = Render {
        format: cli.format.into(),
        output_file: cli.output_file,
    };

    match cli.command {
        Commands::List { proxy_id } => commands::outputs::list(ctx, proxy_id, &render).await,
        Commands::Get { id } => commands::outputs::get(ctx, &id, &render).await,
        Commands::Create {
            id,
            overwrite,
            file,
            fields,
        } => commands::outputs::create(ctx, id, overwrite, file, fields, &render).await,
        Commands::Update { id, file, fields } => {
            commands::outputs::update(ctx, &id, file, fields, &render).await
        }
        Commands::Delete { id } => commands::outputs::delete(ctx, &id, &render).await,
        Commands::EnsureDefault => commands::outputs::ensure_default(ctx, &render).await,
        Commands::Preconfigure { file } => commands::preconfigure::run(ctx, file, &render).await,
        Commands::Policies { command } => commands::policies::run(ctx, command, &render).await,
    }
}
