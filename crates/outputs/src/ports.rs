//! Ports the output service consumes.
//!
//! Responsibilities:
//! - Define the persistence interface for output records (`OutputStore`).
//! - Define the agent policy interface (`PolicyRegistry`).
//! - Define the audit interface (`AuditSink`).
//!
//! Does NOT handle:
//! - Any concrete storage (see `store` and `policy` modules for adapters).
//!
//! Invariants:
//! - Store versions increase on every write; `update` with a stale version
//!   fails with `StoreError::VersionConflict` and changes nothing.
//! - Store errors are surfaced unchanged, never retried here.

use async_trait::async_trait;
use fleet_config::constants::SO_SEARCH_LIMIT;

use crate::audit::AuditEntry;
use crate::error::{PolicyError, StoreError};
use crate::models::policy::{APM_PACKAGE, FLEET_SERVER_PACKAGE};
use crate::models::{AgentPolicy, ListResult, OutputAttributes, PolicyFilter, SavedOutput};

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Capability for internal, non-user-scoped access to the output store.
///
/// Store adapters require one at construction, so privileged access is an
/// explicit decision of whoever wires the service together.
#[derive(Debug, Clone, Copy)]
pub struct SystemAccess(());

impl SystemAccess {
    /// Grant internal access.
    pub fn internal() -> Self {
        Self(())
    }
}

/// Sort order for output queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputSort {
    /// Store order (by id).
    #[default]
    Id,
    /// Default output first, then store order.
    DefaultFirst,
}

/// Filter and pagination for [`OutputStore::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputQuery {
    pub is_default: Option<bool>,
    pub is_default_monitoring: Option<bool>,
    pub is_preconfigured: Option<bool>,
    pub proxy_id: Option<String>,
    pub sort: OutputSort,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Default for OutputQuery {
    fn default() -> Self {
        Self {
            is_default: None,
            is_default_monitoring: None,
            is_preconfigured: None,
            proxy_id: None,
            sort: OutputSort::Id,
            page: 1,
            per_page: SO_SEARCH_LIMIT,
        }
    }
}

impl OutputQuery {
    /// Every output, default first.
    pub fn all() -> Self {
        Self {
            sort: OutputSort::DefaultFirst,
            ..Self::default()
        }
    }

    /// The default data output.
    pub fn default_output() -> Self {
        Self {
            is_default: Some(true),
            ..Self::default()
        }
    }

    /// The default monitoring output.
    pub fn default_monitoring_output() -> Self {
        Self {
            is_default_monitoring: Some(true),
            ..Self::default()
        }
    }

    /// Outputs routed through a proxy.
    pub fn for_proxy(proxy_id: impl Into<String>) -> Self {
        Self {
            proxy_id: Some(proxy_id.into()),
            ..Self::default()
        }
    }

    /// Outputs declared in static configuration.
    pub fn preconfigured() -> Self {
        Self {
            is_preconfigured: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, attributes: &OutputAttributes) -> bool {
        self.is_default.is_none_or(|v| attributes.is_default == v)
            && self
                .is_default_monitoring
                .is_none_or(|v| attributes.is_default_monitoring == v)
            && self
                .is_preconfigured
                .is_none_or(|v| attributes.is_preconfigured == v)
            && self
                .proxy_id
                .as_deref()
                .is_none_or(|p| attributes.proxy_id.as_deref() == Some(p))
    }

    /// Filter, sort and paginate records held by an adapter.
    pub fn apply(&self, records: impl IntoIterator<Item = SavedOutput>) -> ListResult<SavedOutput> {
        let mut matching: Vec<SavedOutput> = records
            .into_iter()
            .filter(|record| self.matches(&record.attributes))
            .collect();

        if self.sort == OutputSort::DefaultFirst {
            // Stable: ties keep store order.
            matching.sort_by_key(|record| !record.attributes.is_default);
        }

        let total = matching.len();
        let page = self.page.max(1);
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(self.per_page))
            .take(self.per_page)
            .collect();

        ListResult {
            items,
            total,
            page,
            per_page: self.per_page,
        }
    }
}

/// Options for [`OutputStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecordOptions {
    /// Canonical id of the new record.
    pub id: String,
    /// Replace an existing record with the same id.
    pub overwrite: bool,
}

/// Persistence for output records, with per-record optimistic versioning.
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Records matching `query`.
    async fn find(&self, query: &OutputQuery) -> StoreResult<ListResult<SavedOutput>>;

    /// Record by canonical id.
    async fn get(&self, id: &str) -> StoreResult<SavedOutput>;

    /// Insert a record, or replace it when `overwrite` is set.
    async fn create(
        &self,
        attributes: OutputAttributes,
        options: CreateRecordOptions,
    ) -> StoreResult<SavedOutput>;

    /// Replace a record's attributes if its version is still `expected_version`.
    async fn update(
        &self,
        id: &str,
        attributes: OutputAttributes,
        expected_version: u64,
    ) -> StoreResult<SavedOutput>;

    /// Remove a record.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Fetch many records; each id gets its own result, in request order.
    async fn bulk_get(&self, ids: &[String]) -> StoreResult<Vec<StoreResult<SavedOutput>>>;

    /// Whether secrets are encrypted before they are persisted.
    fn can_encrypt(&self) -> bool;
}

/// Access to the agent policies that reference outputs.
#[async_trait]
pub trait PolicyRegistry: Send + Sync {
    /// Policies matching `filter`, with their installed packages.
    async fn list_policies(&self, filter: PolicyFilter) -> Result<Vec<AgentPolicy>, PolicyError>;

    /// Point a policy's data output at `output_id` (`None` follows the default).
    ///
    /// Managed policies are only changed when `force` is set.
    async fn update_policy_data_output(
        &self,
        policy_id: &str,
        output_id: Option<String>,
        force: bool,
    ) -> Result<(), PolicyError>;

    /// Detach an output from every policy referencing it. Returns the number
    /// of policies changed.
    async fn remove_output_from_all(&self, output_id: &str) -> Result<usize, PolicyError>;

    /// Bump the revision of every policy using the output (including the
    /// policies following the default when `is_default`). Returns the number
    /// of policies bumped.
    async fn bump_revisions(&self, output_id: &str, is_default: bool)
    -> Result<usize, PolicyError>;

    fn has_apm_integration(&self, policy: &AgentPolicy) -> bool {
        policy.has_package(APM_PACKAGE)
    }

    fn has_fleet_server_integration(&self, policy: &AgentPolicy) -> bool {
        policy.has_package(FLEET_SERVER_PACKAGE)
    }
}

/// Destination for audit records. Recording never fails the operation.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, is_default: bool, proxy_id: Option<&str>) -> SavedOutput {
        SavedOutput {
            id: id.to_string(),
            version: 1,
            attributes: OutputAttributes {
                name: id.to_string(),
                is_default,
                proxy_id: proxy_id.map(str::to_string),
                ..OutputAttributes::default()
            },
        }
    }

    #[test]
    fn test_default_first_sort_is_stable() {
        let records = vec![
            record("a", false, None),
            record("b", true, None),
            record("c", false, None),
        ];
        let result = OutputQuery::all().apply(records);
        let ids: Vec<_> = result.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(result.total, 3);
        assert_eq!(result.page, 1);
        assert_eq!(result.per_page, SO_SEARCH_LIMIT);
    }

    #[test]
    fn test_filters() {
        let records = vec![
            record("a", false, Some("proxy-1")),
            record("b", true, None),
            record("c", false, Some("proxy-2")),
        ];
        let proxied = OutputQuery::for_proxy("proxy-1").apply(records.clone());
        assert_eq!(proxied.total, 1);
        assert_eq!(proxied.items[0].id, "a");

        let defaults = OutputQuery::default_output().apply(records);
        assert_eq!(defaults.items.len(), 1);
        assert_eq!(defaults.items[0].id, "b");
    }

    #[test]
    fn test_pagination() {
        let records: Vec<_> = (0..5).map(|i| record(&format!("o{i}"), false, None)).collect();
        let query = OutputQuery {
            page: 2,
            per_page: 2,
            ..OutputQuery::default()
        };
        let result = query.apply(records);
        let ids: Vec<_> = result.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["o2", "o3"]);
        assert_eq!(result.total, 5);
    }
}
