//! fleet-outputs - Command-line interface for Fleet output configurations.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Run output and agent policy commands against the file-backed stores.
//! - Format and display results (table or JSON).
//!
//! Does NOT handle:
//! - Output invariants or persistence (see `crates/outputs`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr so stdout only carries command results.

mod args;
mod commands;
mod context;
mod dispatch;
mod error;
mod formatters;

use anyhow::Context;
use args::{Cli, LogFormat};
use clap::Parser;
use context::CommandContext;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use fleet_config::{ConfigLoader, FleetConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::from_default_env();
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<FleetConfig> {
    let mut loader = ConfigLoader::new();

    // Blank/whitespace-only values are ignored to allow fallback to env var
    if let Some(path) = &cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }

    loader = loader
        .from_env()
        .context("Failed to load configuration from environment")?
        .from_file()
        .context("Failed to load configuration file")?;

    if let Some(dir) = &cli.data_dir {
        loader = loader.with_data_dir(dir.clone());
    }

    loader.build().context("Failed to build configuration")
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    if !config.can_encrypt() {
        tracing::warn!(
            "FLEET_ENCRYPTION_KEY is not set; Logstash outputs cannot be created"
        );
    }

    let exit_code = match CommandContext::open(config) {
        Ok(ctx) => match run_command(cli, &ctx).await {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("{:#}", e);
                e.exit_code()
            }
        },
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
