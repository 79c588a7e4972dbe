//! Output creation.

use fleet_config::constants::OUTPUT_SAVED_OBJECT_TYPE;

use crate::audit::AuditAction;
use crate::error::{OutputError, Result, StoreError};
use crate::hosts::normalize_host_for_agents;
use crate::ids::{generate_output_id, output_id_to_uuid};
use crate::metrics::DefaultKind;
use crate::models::{NewOutput, Output, OutputAttributes, OutputType};
use crate::ports::CreateRecordOptions;

use super::validation::shipper_enabled;
use super::{CreateOptions, OutputService, UpdateOptions};

impl OutputService {
    /// Create an output.
    ///
    /// A new default (or default monitoring) output demotes the previous one
    /// first. A default Logstash output pins Fleet Server policies that follow
    /// the default to the previous default output.
    pub async fn create(&self, output: NewOutput, options: CreateOptions) -> Result<Output> {
        let label = options.id.clone();
        self.observe("create", label.as_deref(), self.create_output(output, options))
            .await
    }

    pub(super) async fn create_output(
        &self,
        mut output: NewOutput,
        options: CreateOptions,
    ) -> Result<Output> {
        let canonical_id = options.id.as_deref().map(output_id_to_uuid);
        let overwrite = options.overwrite || options.from_preconfiguration;
        let update_options = UpdateOptions {
            from_preconfiguration: options.from_preconfiguration,
        };

        // Payload checks before any side effect.
        let keep_shipper = shipper_enabled(output.config_yaml.as_deref())?;
        if let Some(id) = &canonical_id
            && !overwrite
        {
            match self.store.get(id).await {
                Ok(_) => {
                    return Err(StoreError::AlreadyExists {
                        object_type: OUTPUT_SAVED_OBJECT_TYPE.to_string(),
                        id: id.clone(),
                    }
                    .into());
                }
                Err(StoreError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let previous_default = self.default_record(DefaultKind::Data).await?;

        if output.output_type == OutputType::Logstash {
            self.ensure_not_used_by_apm(canonical_id.as_deref(), output.is_default)
                .await?;
            if !self.store.can_encrypt() {
                return Err(OutputError::EncryptionRequired(
                    "Logstash output needs an encryption key to be set".to_string(),
                ));
            }

            if output.is_default {
                let fleet_server_policies = self.fleet_server_policies(None, false).await?;
                // Without a previous default there is no Elasticsearch target, so
                // Fleet Server policies keep following the new Logstash default.
                let target = previous_default
                    .as_ref()
                    .map(|record| record.id.as_str())
                    .filter(|id| Some(*id) != canonical_id.as_deref());
                self.pin_fleet_server_policies(
                    &fleet_server_policies,
                    target,
                    options.from_preconfiguration,
                )
                .await?;
            }
        }

        if output.is_default
            && let Some(previous) = &previous_default
            && Some(previous.id.as_str()) != canonical_id.as_deref()
        {
            self.demote(previous, DefaultKind::Data, update_options)
                .await?;
        }
        if output.is_default_monitoring
            && let Some(previous) = self.default_record(DefaultKind::Monitoring).await?
            && Some(previous.id.as_str()) != canonical_id.as_deref()
        {
            self.demote(&previous, DefaultKind::Monitoring, update_options)
                .await?;
        }

        if output.output_type == OutputType::Elasticsearch {
            output.hosts = output
                .hosts
                .iter()
                .map(|host| normalize_host_for_agents(host))
                .collect();
        }
        if !keep_shipper {
            output.shipper = None;
        }

        let attributes = OutputAttributes::from_new(output)?;
        let id = canonical_id.unwrap_or_else(generate_output_id);

        self.audit(AuditAction::Create, &id);
        let saved = self
            .store
            .create(attributes, CreateRecordOptions { id, overwrite })
            .await?;

        tracing::info!(
            id = %saved.id,
            output_type = %saved.attributes.output_type,
            is_default = saved.attributes.is_default,
            is_default_monitoring = saved.attributes.is_default_monitoring,
            "Output created"
        );
        Output::from_saved(saved)
    }
}
