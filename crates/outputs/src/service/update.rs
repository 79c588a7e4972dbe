//! Output updates.

use crate::audit::AuditAction;
use crate::error::{OutputError, Result};
use crate::hosts::normalize_host_for_agents;
use crate::metrics::DefaultKind;
use crate::models::{Output, OutputPatch, OutputType, Patch};

use super::validation::{
    ensure_not_used_by_fleet_server, ensure_preconfigured_edit_allowed, parse_config_yaml,
    shipper_enabled,
};
use super::{OutputService, UpdateOptions};

impl OutputService {
    /// Apply a partial update to an output.
    pub async fn update(&self, id: &str, patch: OutputPatch, options: UpdateOptions) -> Result<()> {
        self.observe(
            "update",
            Some(id),
            self.update_output(id, patch, options, None, true),
        )
        .await
    }

    /// Shared update path.
    ///
    /// `expected_version` guards the write against concurrent changes since the
    /// caller read the record. With `allow_demotion` unset, setting a default
    /// flag never demotes another output.
    pub(super) async fn update_output(
        &self,
        id: &str,
        mut patch: OutputPatch,
        options: UpdateOptions,
        expected_version: Option<u64>,
        allow_demotion: bool,
    ) -> Result<()> {
        let record = self.get_record(id).await?;
        let canonical = record.id.clone();
        let existing = Output::from_saved(record.clone())?;

        if existing.is_preconfigured && !options.from_preconfiguration {
            ensure_preconfigured_edit_allowed(&existing, &patch)?;
        }

        if let Patch::Set(yaml) = &patch.config_yaml {
            parse_config_yaml(yaml)?;
        }

        let merged_type = patch.output_type.unwrap_or(existing.output_type);
        let merged_is_default = patch.is_default.unwrap_or(existing.is_default);
        let type_changed = merged_type != existing.output_type;
        let previous_default = self.default_record(DefaultKind::Data).await?;

        // Policy checks against the merged view.
        let fleet_server_policies = self
            .fleet_server_policies(Some(&canonical), merged_is_default)
            .await?;
        if merged_type == OutputType::Logstash || existing.output_type == OutputType::Logstash {
            self.ensure_not_used_by_apm(Some(&canonical), merged_is_default)
                .await?;
        }
        if existing.output_type == OutputType::Elasticsearch && merged_type == OutputType::Logstash
        {
            ensure_not_used_by_fleet_server(&fleet_server_policies)?;
            if !self.store.can_encrypt() {
                return Err(OutputError::EncryptionRequired(
                    "Logstash output needs an encryption key to be set".to_string(),
                ));
            }
        }
        if merged_type == OutputType::Logstash && merged_is_default {
            let target = previous_default
                .as_ref()
                .map(|record| record.id.as_str())
                .filter(|previous_id| *previous_id != canonical);
            self.pin_fleet_server_policies(
                &fleet_server_policies,
                target,
                options.from_preconfiguration,
            )
            .await?;
        }

        if type_changed {
            match merged_type {
                OutputType::Logstash => {
                    patch.ca_sha256 = Patch::Clear;
                    patch.ca_trusted_fingerprint = Patch::Clear;
                }
                OutputType::Elasticsearch => {
                    if !patch.ssl.is_set() {
                        patch.ssl = Patch::Clear;
                    }
                }
            }
        }

        if allow_demotion {
            if patch.is_default == Some(true)
                && let Some(previous) = &previous_default
                && previous.id != canonical
            {
                self.demote(previous, DefaultKind::Data, options).await?;
            }
            if patch.is_default_monitoring == Some(true)
                && let Some(previous) = self.default_record(DefaultKind::Monitoring).await?
                && previous.id != canonical
            {
                self.demote(&previous, DefaultKind::Monitoring, options)
                    .await?;
            }
        }

        if merged_type == OutputType::Elasticsearch
            && let Some(hosts) = patch.hosts.as_mut()
        {
            *hosts = hosts
                .iter()
                .map(|host| normalize_host_for_agents(host))
                .collect();
        }

        if patch.shipper.is_set() {
            let config_yaml = match &patch.config_yaml {
                Patch::Set(yaml) => Some(yaml.as_str()),
                Patch::Clear => None,
                Patch::Absent => existing.config_yaml.as_deref(),
            };
            if !shipper_enabled(config_yaml)? {
                patch.shipper = Patch::Clear;
            }
        }

        let mut attributes = record.attributes;
        patch.apply_to(&mut attributes)?;

        self.audit(AuditAction::Update, &canonical);
        self.store
            .update(
                &canonical,
                attributes,
                expected_version.unwrap_or(record.version),
            )
            .await?;

        tracing::info!(id = %canonical, "Output updated");
        Ok(())
    }
}

