//! Read operations.

use crate::audit::AuditAction;
use crate::error::{OutputError, Result, StoreError};
use crate::ids::output_id_to_uuid;
use crate::models::{ListResult, Output, SavedOutput};
use crate::ports::OutputQuery;

use super::{BulkGetOptions, OutputService};

impl OutputService {
    /// Get an output by id (canonicalised first).
    pub async fn get(&self, id: &str) -> Result<Output> {
        self.observe("get", Some(id), async {
            let record = self.get_record(id).await?;
            Output::from_saved(record)
        })
        .await
    }

    /// Get several outputs. With `ignore_not_found`, missing ids are dropped;
    /// any other failure fails the whole batch.
    pub async fn bulk_get(&self, ids: &[String], options: BulkGetOptions) -> Result<Vec<Output>> {
        self.observe("bulk_get", None, async {
            let canonical: Vec<String> = ids.iter().map(|id| output_id_to_uuid(id)).collect();
            let results = self.store.bulk_get(&canonical).await?;

            let mut outputs = Vec::with_capacity(results.len());
            for result in results {
                match result {
                    Ok(record) => {
                        self.audit(AuditAction::Get, &record.id);
                        outputs.push(Output::from_saved(record)?);
                    }
                    Err(StoreError::NotFound { .. }) if options.ignore_not_found => {}
                    Err(StoreError::NotFound { id, .. }) => return Err(OutputError::NotFound(id)),
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(outputs)
        })
        .await
    }

    /// Every output, default first.
    pub async fn list(&self) -> Result<ListResult<Output>> {
        self.observe("list", None, self.list_outputs()).await
    }

    /// Every output routed through `proxy_id`.
    pub async fn list_all_for_proxy_id(&self, proxy_id: &str) -> Result<ListResult<Output>> {
        self.observe("list_for_proxy", None, self.find_outputs(&OutputQuery::for_proxy(proxy_id)))
            .await
    }

    pub(super) async fn list_outputs(&self) -> Result<ListResult<Output>> {
        self.find_outputs(&OutputQuery::all()).await
    }

    async fn find_outputs(&self, query: &OutputQuery) -> Result<ListResult<Output>> {
        let records = self.store.find(query).await?;
        for record in &records.items {
            self.audit(AuditAction::Get, &record.id);
        }
        records.try_map(Output::from_saved)
    }

    /// Fetch and audit one stored record; a missing record is `NotFound`.
    pub(super) async fn get_record(&self, id: &str) -> Result<SavedOutput> {
        let canonical = output_id_to_uuid(id);
        let record = self.store.get(&canonical).await.map_err(|e| match e {
            StoreError::NotFound { .. } => OutputError::NotFound(id.to_string()),
            e => e.into(),
        })?;
        self.audit(AuditAction::Get, &record.id);
        Ok(record)
    }
}
