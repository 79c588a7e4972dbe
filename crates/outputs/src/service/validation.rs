//! Policy conflict checks and payload rules shared by create and update.

use crate::error::{OutputError, Result};
use crate::models::{AgentPolicy, Output, OutputPatch, PolicyFilter};

use super::OutputService;

impl OutputService {
    /// Reject a Logstash output that an APM policy would use, either directly
    /// or by following the default.
    pub(super) async fn ensure_not_used_by_apm(
        &self,
        output_id: Option<&str>,
        is_default: bool,
    ) -> Result<()> {
        let Some(filter) = PolicyFilter::for_output(output_id, is_default) else {
            return Ok(());
        };

        let policies = self.policies.list_policies(filter).await?;
        if let Some(policy) = policies
            .iter()
            .find(|policy| self.policies.has_apm_integration(policy))
        {
            tracing::debug!(policy_id = %policy.id, "APM policy would use a Logstash output");
            return Err(OutputError::InvalidOutput(
                "Logstash output cannot be used with APM integration.".to_string(),
            ));
        }
        Ok(())
    }

    /// Fleet Server policies using the output, or every Fleet Server policy
    /// when no output id is given.
    pub(super) async fn fleet_server_policies(
        &self,
        output_id: Option<&str>,
        is_default: bool,
    ) -> Result<Vec<AgentPolicy>> {
        let filter = match output_id {
            Some(_) => match PolicyFilter::for_output(output_id, is_default) {
                Some(filter) => filter,
                None => return Ok(Vec::new()),
            },
            None => PolicyFilter::All,
        };

        let policies = self.policies.list_policies(filter).await?;
        Ok(policies
            .into_iter()
            .filter(|policy| self.policies.has_fleet_server_integration(policy))
            .collect())
    }

    /// Pin Fleet Server policies that follow the default to `target_output_id`,
    /// so they keep shipping to Elasticsearch when a Logstash output becomes
    /// the default.
    pub(super) async fn pin_fleet_server_policies(
        &self,
        policies: &[AgentPolicy],
        target_output_id: Option<&str>,
        force: bool,
    ) -> Result<()> {
        let Some(target) = target_output_id else {
            return Ok(());
        };

        let mut pinned = 0;
        for policy in policies.iter().filter(|p| p.data_output_id.is_none()) {
            self.policies
                .update_policy_data_output(&policy.id, Some(target.to_string()), force)
                .await?;
            pinned += 1;
        }

        if pinned > 0 {
            tracing::info!(
                output_id = %target,
                policies = pinned,
                "Pinned Fleet Server policies to the previous default output"
            );
        }
        self.metrics.record_policies_pinned(pinned);
        Ok(())
    }
}

/// Reject changing an Elasticsearch output to Logstash while Fleet Server
/// policies use it.
pub(super) fn ensure_not_used_by_fleet_server(policies: &[AgentPolicy]) -> Result<()> {
    match policies.first() {
        Some(policy) => Err(OutputError::InvalidOutput(format!(
            "Logstash output cannot be used with Fleet Server integration in {}. Please create a new Elasticsearch output.",
            policy.name
        ))),
        None => Ok(()),
    }
}

/// Reject runtime edits of a preconfigured output outside its `allow_edit` list.
pub(super) fn ensure_preconfigured_edit_allowed(existing: &Output, patch: &OutputPatch) -> Result<()> {
    match patch
        .changed_fields(existing)
        .into_iter()
        .find(|field| !existing.allow_edit.contains(field))
    {
        Some(field) => Err(OutputError::Unauthorized(format!(
            "Preconfigured output {} {field} cannot be updated outside of the config file.",
            existing.id
        ))),
        None => Ok(()),
    }
}

/// Whether `config_yaml` enables the shipper.
///
/// The shipper is disabled when there is no YAML, no `shipper` section, or
/// `shipper.enabled: false`.
pub(crate) fn shipper_enabled(config_yaml: Option<&str>) -> Result<bool> {
    let Some(yaml) = config_yaml else {
        return Ok(false);
    };
    let document = parse_config_yaml(yaml)?;

    let enabled = match document.get("shipper") {
        None | Some(serde_yaml::Value::Null) | Some(serde_yaml::Value::Bool(false)) => false,
        Some(shipper) => !matches!(
            shipper.get("enabled"),
            Some(serde_yaml::Value::Bool(false))
        ),
    };
    Ok(enabled)
}

/// Parse advanced YAML configuration.
pub(super) fn parse_config_yaml(yaml: &str) -> Result<serde_yaml::Value> {
    if yaml.trim().is_empty() {
        return Ok(serde_yaml::Value::Null);
    }
    serde_yaml::from_str(yaml).map_err(|e| OutputError::InvalidConfigYaml(e.to_string()))
}
