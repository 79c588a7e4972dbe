//! Default output lookup, demotion and bootstrap.

use fleet_config::constants::{DEFAULT_OUTPUT_ID, DEFAULT_OUTPUT_NAME};

use crate::audit::AuditAction;
use crate::error::Result;
use crate::metrics::DefaultKind;
use crate::models::{NewOutput, Output, OutputPatch, OutputType, SavedOutput};
use crate::ports::OutputQuery;

use super::{BoxFuture, CreateOptions, OutputService, UpdateOptions};

impl OutputService {
    /// Id of the default data output, if any.
    pub async fn get_default_data_output_id(&self) -> Result<Option<String>> {
        self.observe("get_default_output", None, async {
            Ok(self.default_record(DefaultKind::Data).await?.map(|r| r.id))
        })
        .await
    }

    /// Id of the default monitoring output, if any.
    pub async fn get_default_monitoring_output_id(&self) -> Result<Option<String>> {
        self.observe("get_default_monitoring_output", None, async {
            Ok(self.default_record(DefaultKind::Monitoring).await?.map(|r| r.id))
        })
        .await
    }

    /// Elasticsearch hosts for a bootstrapped default output.
    pub fn default_es_hosts(&self) -> Vec<String> {
        self.config.default_es_hosts()
    }

    /// Return the default output, creating one from the environment when none exists.
    pub async fn ensure_default_output(&self) -> Result<Output> {
        self.observe("ensure_default_output", None, async {
            let outputs = self.list_outputs().await?;

            if let Some(existing) = outputs.items.iter().find(|o| o.is_default) {
                return Ok(existing.clone());
            }

            let has_monitoring_default = outputs.items.iter().any(|o| o.is_default_monitoring);
            let output = NewOutput {
                name: DEFAULT_OUTPUT_NAME.to_string(),
                output_type: OutputType::Elasticsearch,
                hosts: self.default_es_hosts(),
                is_default: true,
                is_default_monitoring: !has_monitoring_default,
                ca_sha256: self.config.agents.elasticsearch.ca_sha256.clone(),
                ..NewOutput::default()
            };

            tracing::info!(id = DEFAULT_OUTPUT_ID, "Creating default output");
            self.create_output(
                output,
                CreateOptions {
                    id: Some(DEFAULT_OUTPUT_ID.to_string()),
                    overwrite: true,
                    ..CreateOptions::default()
                },
            )
            .await
        })
        .await
    }

    /// Current holder of a default flag, with the version it was read at.
    pub(super) async fn default_record(&self, kind: DefaultKind) -> Result<Option<SavedOutput>> {
        let query = match kind {
            DefaultKind::Data => OutputQuery::default_output(),
            DefaultKind::Monitoring => OutputQuery::default_monitoring_output(),
        };
        let records = self.store.find(&query).await?;
        for record in &records.items {
            self.audit(AuditAction::Get, &record.id);
        }
        Ok(records.items.into_iter().next())
    }

    /// Clear a default flag on its previous holder.
    ///
    /// Runs the regular update path once, guarded by `previous.version`, and
    /// never demotes further.
    pub(super) fn demote<'a>(
        &'a self,
        previous: &'a SavedOutput,
        kind: DefaultKind,
        options: UpdateOptions,
    ) -> BoxFuture<'a, Result<()>> {
        let patch = match kind {
            DefaultKind::Data => OutputPatch::is_default(false),
            DefaultKind::Monitoring => OutputPatch::is_default_monitoring(false),
        };

        Box::pin(async move {
            tracing::info!(
                previous_id = %previous.id,
                kind = kind.as_str(),
                "Demoting previous default output"
            );
            self.update_output(&previous.id, patch, options, Some(previous.version), false)
                .await?;
            self.metrics.record_demotion(kind);
            Ok(())
        })
    }
}
