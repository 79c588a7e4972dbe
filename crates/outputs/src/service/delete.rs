//! Output deletion.

use crate::audit::AuditAction;
use crate::error::{OutputError, Result};
use crate::models::Output;

use super::{DeleteOptions, OutputService};

impl OutputService {
    /// Delete an output after detaching it from every policy.
    ///
    /// Preconfigured and default outputs can only be deleted with
    /// `from_preconfiguration`.
    pub async fn delete(&self, id: &str, options: DeleteOptions) -> Result<()> {
        self.observe("delete", Some(id), async {
            let existing = Output::from_saved(self.get_record(id).await?)?;

            if !options.from_preconfiguration {
                if existing.is_preconfigured {
                    return Err(OutputError::Unauthorized(format!(
                        "Preconfigured output {id} cannot be deleted outside of the config file."
                    )));
                }
                if existing.is_default {
                    return Err(OutputError::Unauthorized(format!(
                        "Default output {id} cannot be deleted."
                    )));
                }
                if existing.is_default_monitoring {
                    return Err(OutputError::Unauthorized(format!(
                        "Default monitoring output {id} cannot be deleted."
                    )));
                }
            }

            let detached = self.policies.remove_output_from_all(&existing.id).await?;
            tracing::debug!(id = %existing.id, policies = detached, "Detached output from policies");

            self.audit(AuditAction::Delete, &existing.id);
            self.store.delete(&existing.id).await?;
            Ok(())
        })
        .await
    }
}
