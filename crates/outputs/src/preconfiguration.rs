//! Outputs declared in static configuration.
//!
//! Responsibilities:
//! - Load the preconfigured output list from YAML.
//! - Create, update or leave each declared output so the store matches the list.
//! - Delete (or unmark, for current defaults) preconfigured outputs that left the list.
//!
//! Invariants:
//! - Every declared output is stored with `is_preconfigured = true`.
//! - Applying the same list twice changes nothing the second time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::OutputError;
use crate::hosts::normalize_host_for_agents;
use crate::ids::output_id_to_uuid;
use crate::models::{NewOutput, Output, OutputPatch, OutputType};
use crate::service::validation::shipper_enabled;
use crate::service::{
    BulkGetOptions, CreateOptions, DeleteOptions, OutputService, UpdateOptions,
};

/// Errors while loading or applying preconfigured outputs.
#[derive(Error, Debug)]
pub enum PreconfigurationError {
    #[error("Failed to read preconfigured outputs at {path}: {kind}")]
    Read {
        path: PathBuf,
        kind: std::io::ErrorKind,
    },

    #[error("Failed to parse preconfigured outputs at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The declared list is inconsistent.
    #[error("Invalid preconfigured outputs: {0}")]
    Invalid(String),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// One output declared in static configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreconfiguredOutput {
    /// Human-chosen id; canonicalised before storage.
    pub id: String,
    #[serde(flatten)]
    pub output: NewOutput,
    /// Advanced settings, stored as `config_yaml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PreconfiguredOutputsFile {
    #[serde(default)]
    outputs: Vec<PreconfiguredOutput>,
}

/// Canonical ids touched by one application of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreconfigurationReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
    /// Former preconfigured outputs kept because they are a current default.
    pub unmarked: Vec<String>,
}

/// Load the `outputs:` list from a YAML file.
pub fn load_preconfigured_outputs(
    path: &Path,
) -> Result<Vec<PreconfiguredOutput>, PreconfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|e| PreconfigurationError::Read {
        path: path.to_path_buf(),
        kind: e.kind(),
    })?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: PreconfiguredOutputsFile =
        serde_yaml::from_str(&content).map_err(|e| PreconfigurationError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(file.outputs)
}

/// Reject lists with several defaults or duplicate ids.
pub fn validate_preconfigured_outputs(
    outputs: &[PreconfiguredOutput],
) -> Result<(), PreconfigurationError> {
    if outputs.iter().filter(|o| o.output.is_default).count() > 1 {
        return Err(PreconfigurationError::Invalid(
            "Only one default output is allowed".to_string(),
        ));
    }
    if outputs
        .iter()
        .filter(|o| o.output.is_default_monitoring)
        .count()
        > 1
    {
        return Err(PreconfigurationError::Invalid(
            "Only one default monitoring output is allowed".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for output in outputs {
        if !seen.insert(output_id_to_uuid(&output.id)) {
            return Err(PreconfigurationError::Invalid(format!(
                "Duplicate output id {}",
                output.id
            )));
        }
    }
    Ok(())
}

/// The stored form of a declared output, for creation and comparison.
fn desired_output(
    service: &OutputService,
    declared: &PreconfiguredOutput,
) -> Result<NewOutput, PreconfigurationError> {
    let mut output = declared.output.clone();
    output.is_preconfigured = true;

    if let Some(config) = &declared.config
        && !config.is_null()
    {
        let yaml = serde_yaml::to_string(config).map_err(|e| {
            PreconfigurationError::Invalid(format!("output {}: config: {e}", declared.id))
        })?;
        output.config_yaml = Some(yaml);
    }
    if !shipper_enabled(output.config_yaml.as_deref())? {
        output.shipper = None;
    }

    if output.output_type == OutputType::Elasticsearch {
        if output.hosts.is_empty() {
            output.hosts = service.default_es_hosts();
        }
        output.hosts = output
            .hosts
            .iter()
            .map(|host| normalize_host_for_agents(host))
            .collect();
    }
    Ok(output)
}

fn differs(existing: &Output, desired: &NewOutput) -> bool {
    &NewOutput::from(existing.clone()) != desired
}

/// Make the store match the declared list.
pub async fn ensure_preconfigured_outputs(
    service: &OutputService,
    outputs: &[PreconfiguredOutput],
) -> Result<PreconfigurationReport, PreconfigurationError> {
    validate_preconfigured_outputs(outputs)?;

    let mut report = PreconfigurationReport::default();
    let declared_ids: Vec<String> = outputs.iter().map(|o| o.id.clone()).collect();
    let existing = if declared_ids.is_empty() {
        Vec::new()
    } else {
        service
            .bulk_get(&declared_ids, BulkGetOptions::default())
            .await?
    };

    let from_preconfiguration = UpdateOptions {
        from_preconfiguration: true,
    };

    for declared in outputs {
        let canonical = output_id_to_uuid(&declared.id);
        let desired = desired_output(service, declared)?;

        match existing.iter().find(|o| o.id == canonical) {
            None => {
                service
                    .create(
                        desired,
                        CreateOptions {
                            id: Some(declared.id.clone()),
                            from_preconfiguration: true,
                            overwrite: true,
                        },
                    )
                    .await?;
                tracing::info!(id = %declared.id, "Created preconfigured output");
                report.created.push(canonical);
            }
            Some(current) if differs(current, &desired) => {
                let is_default = desired.is_default;
                service
                    .update(&canonical, OutputPatch::from(desired), from_preconfiguration)
                    .await?;
                let bumped = service
                    .policies()
                    .bump_revisions(&canonical, is_default)
                    .await
                    .map_err(OutputError::from)?;
                tracing::info!(
                    id = %declared.id,
                    policies = bumped,
                    "Updated preconfigured output"
                );
                report.updated.push(canonical);
            }
            Some(_) => report.unchanged.push(canonical),
        }
    }

    let declared: HashSet<String> = outputs
        .iter()
        .map(|o| output_id_to_uuid(&o.id))
        .collect();
    let stored = service.list().await?;
    for stale in stored
        .items
        .into_iter()
        .filter(|o| o.is_preconfigured && !declared.contains(&o.id))
    {
        if stale.is_default || stale.is_default_monitoring {
            service
                .update(
                    &stale.id,
                    OutputPatch {
                        is_preconfigured: Some(false),
                        ..OutputPatch::default()
                    },
                    from_preconfiguration,
                )
                .await?;
            tracing::info!(id = %stale.id, "Unmarked preconfigured default output");
            report.unmarked.push(stale.id);
        } else {
            service
                .delete(
                    &stale.id,
                    DeleteOptions {
                        from_preconfiguration: true,
                    },
                )
                .await?;
            tracing::info!(id = %stale.id, "Deleted preconfigured output");
            report.deleted.push(stale.id);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(id: &str, is_default: bool, is_default_monitoring: bool) -> PreconfiguredOutput {
        PreconfiguredOutput {
            id: id.to_string(),
            output: NewOutput {
                is_default,
                is_default_monitoring,
                ..NewOutput::new(id, OutputType::Elasticsearch, vec![])
            },
            config: None,
        }
    }

    #[test]
    fn test_validation_rejects_two_defaults() {
        let err = validate_preconfigured_outputs(&[
            declared("a", true, false),
            declared("b", true, false),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid preconfigured outputs: Only one default output is allowed"
        );
    }

    #[test]
    fn test_validation_rejects_two_monitoring_defaults() {
        let err = validate_preconfigured_outputs(&[
            declared("a", false, true),
            declared("b", false, true),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("default monitoring"));
    }

    #[test]
    fn test_validation_rejects_duplicate_ids() {
        let err = validate_preconfigured_outputs(&[
            declared("a", true, false),
            declared("a", false, false),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate output id a"));
    }

    #[test]
    fn test_yaml_list_is_parsed() {
        let file: PreconfiguredOutputsFile = serde_yaml::from_str(
            r#"
outputs:
  - id: es-main
    name: Main cluster
    type: elasticsearch
    hosts: ["https://es.internal:9200"]
    is_default: true
    allow_edit: [hosts]
    config:
      bulk_max_size: 100
  - id: ls
    name: Logstash
    type: logstash
    hosts: ["logstash:5044"]
"#,
        )
        .unwrap();

        assert_eq!(file.outputs.len(), 2);
        let main = &file.outputs[0];
        assert_eq!(main.id, "es-main");
        assert!(main.output.is_default);
        assert_eq!(main.output.allow_edit, vec![crate::models::OutputField::Hosts]);
        assert!(main.config.is_some());
        assert_eq!(file.outputs[1].output.output_type, OutputType::Logstash);
    }
}
