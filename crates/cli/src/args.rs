//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Turn output flags into `NewOutput` / `OutputPatch` payloads.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load configuration (see `main()`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fleet_outputs::{NewOutput, OutputPatch, OutputType, Patch};

#[derive(Parser)]
#[command(name = "fleet-outputs")]
#[command(about = "Manage Fleet output configurations from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  fleet-outputs list\n  fleet-outputs create --name main --type elasticsearch --host https://es:9200 --default\n  fleet-outputs update main --host https://es2:9200\n  fleet-outputs --format json get main\n  fleet-outputs preconfigure --file outputs.yml\n"
)]
pub struct Cli {
    /// Path to a YAML configuration file.
    ///
    /// Can also be set via FLEET_CONFIG_PATH environment variable.
    #[arg(long = "config", global = true, env = "FLEET_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Directory holding the output and agent policy stores
    #[arg(long, global = true, env = "FLEET_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = FormatArg::Table)]
    pub format: FormatArg,

    /// Log format written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputTypeArg {
    Elasticsearch,
    Logstash,
}

impl From<OutputTypeArg> for OutputType {
    fn from(arg: OutputTypeArg) -> Self {
        match arg {
            OutputTypeArg::Elasticsearch => OutputType::Elasticsearch,
            OutputTypeArg::Logstash => OutputType::Logstash,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every output, default first
    List {
        /// Only outputs routed through this proxy
        #[arg(long)]
        proxy_id: Option<String>,
    },

    /// Show one output
    Get {
        /// Output id (human-chosen or canonical)
        id: String,
    },

    /// Create an output from flags or a YAML/JSON file
    Create {
        /// Id for the new output; generated when omitted
        #[arg(long)]
        id: Option<String>,

        /// Replace an existing output with the same id
        #[arg(long)]
        overwrite: bool,

        /// Read the output from a YAML or JSON file
        #[arg(long, value_name = "FILE", conflicts_with_all = ["name", "output_type", "hosts"])]
        file: Option<PathBuf>,

        #[command(flatten)]
        fields: OutputFields,
    },

    /// Update an output from flags or a YAML/JSON patch file (null clears a field)
    Update {
        /// Output id (human-chosen or canonical)
        id: String,

        /// Read the patch from a YAML or JSON file
        #[arg(long, value_name = "FILE", conflicts_with_all = ["name", "output_type", "hosts"])]
        file: Option<PathBuf>,

        #[command(flatten)]
        fields: OutputFields,
    },

    /// Delete an output and detach it from every agent policy
    Delete {
        /// Output id (human-chosen or canonical)
        id: String,
    },

    /// Create the default output from the environment when none exists
    EnsureDefault,

    /// Apply outputs declared in a preconfiguration file
    Preconfigure {
        /// Preconfiguration file; falls back to FLEET_PRECONFIGURED_OUTPUTS
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Inspect and seed agent policies
    Policies {
        #[command(subcommand)]
        command: PoliciesCommand,
    },
}

#[derive(Subcommand)]
pub enum PoliciesCommand {
    /// List agent policies
    List,

    /// Add or replace an agent policy
    Add {
        /// Policy id
        id: String,

        /// Display name; defaults to the id
        #[arg(long)]
        name: Option<String>,

        /// Data output id; omitted means the policy follows the default output
        #[arg(long)]
        data_output: Option<String>,

        /// Monitoring output id
        #[arg(long)]
        monitoring_output: Option<String>,

        /// Installed integration package (repeatable), e.g. apm or fleet_server
        #[arg(long = "package", value_name = "NAME")]
        packages: Vec<String>,

        /// Mark the policy as managed (hosted)
        #[arg(long)]
        managed: bool,
    },
}

/// Output fields settable from flags.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Output type
    #[arg(long = "type", value_enum)]
    pub output_type: Option<OutputTypeArg>,

    /// Host URL (repeatable)
    #[arg(long = "host", value_name = "URL")]
    pub hosts: Vec<String>,

    /// Make this the default output
    #[arg(long = "default", num_args = 0..=1, default_missing_value = "true")]
    pub is_default: Option<bool>,

    /// Make this the default monitoring output
    #[arg(long = "default-monitoring", num_args = 0..=1, default_missing_value = "true")]
    pub is_default_monitoring: Option<bool>,

    /// CA fingerprint for agents connecting to Elasticsearch
    #[arg(long)]
    pub ca_sha256: Option<String>,

    /// Trusted CA fingerprint
    #[arg(long)]
    pub ca_trusted_fingerprint: Option<String>,

    /// File holding advanced YAML configuration
    #[arg(long, value_name = "FILE")]
    pub config_yaml_file: Option<PathBuf>,

    /// Proxy id
    #[arg(long)]
    pub proxy_id: Option<String>,
}

impl OutputFields {
    fn config_yaml(&self) -> Result<Option<String>> {
        self.config_yaml_file
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
            })
            .transpose()
    }

    /// Payload for `create`; name and type are required.
    pub fn into_new_output(self) -> Result<NewOutput> {
        let config_yaml = self.config_yaml()?;
        let name = self
            .name
            .context("--name is required unless --file is given")?;
        let output_type = self
            .output_type
            .context("--type is required unless --file is given")?;

        Ok(NewOutput {
            is_default: self.is_default.unwrap_or(false),
            is_default_monitoring: self.is_default_monitoring.unwrap_or(false),
            ca_sha256: self.ca_sha256,
            ca_trusted_fingerprint: self.ca_trusted_fingerprint,
            config_yaml,
            proxy_id: self.proxy_id,
            ..NewOutput::new(name, output_type.into(), self.hosts)
        })
    }

    /// Patch for `update`; only given flags are changed.
    pub fn into_patch(self) -> Result<OutputPatch> {
        let config_yaml = self.config_yaml()?;
        Ok(OutputPatch {
            name: self.name,
            output_type: self.output_type.map(Into::into),
            hosts: (!self.hosts.is_empty()).then_some(self.hosts),
            is_default: self.is_default,
            is_default_monitoring: self.is_default_monitoring,
            ca_sha256: set_if_given(self.ca_sha256),
            ca_trusted_fingerprint: set_if_given(self.ca_trusted_fingerprint),
            config_yaml: set_if_given(config_yaml),
            proxy_id: set_if_given(self.proxy_id),
            ..OutputPatch::default()
        })
    }
}

/// Flags cannot clear a field; an omitted flag leaves it untouched.
fn set_if_given<T>(value: Option<T>) -> Patch<T> {
    value.map_or(Patch::Absent, Patch::Set)
}
