//! In-memory agent policy registry.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PolicySet;
use crate::error::PolicyError;
use crate::models::{AgentPolicy, PolicyFilter};
use crate::ports::PolicyRegistry;

/// Policy registry backed by a map in process memory.
#[derive(Debug, Default)]
pub struct MemoryPolicyRegistry {
    policies: RwLock<PolicySet>,
}

impl MemoryPolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with `policies`.
    pub fn with_policies(policies: impl IntoIterator<Item = AgentPolicy>) -> Self {
        Self {
            policies: RwLock::new(PolicySet::from_policies(policies)),
        }
    }

    /// Add or replace a policy.
    pub async fn insert(&self, policy: AgentPolicy) {
        self.policies.write().await.upsert(policy);
    }

    pub async fn get(&self, id: &str) -> Option<AgentPolicy> {
        self.policies.read().await.get(id).cloned()
    }

    pub async fn all(&self) -> Vec<AgentPolicy> {
        self.policies.read().await.all()
    }
}

#[async_trait]
impl PolicyRegistry for MemoryPolicyRegistry {
    async fn list_policies(&self, filter: PolicyFilter) -> Result<Vec<AgentPolicy>, PolicyError> {
        Ok(self.policies.read().await.list(&filter))
    }

    async fn update_policy_data_output(
        &self,
        policy_id: &str,
        output_id: Option<String>,
        force: bool,
    ) -> Result<(), PolicyError> {
        self.policies
            .write()
            .await
            .update_data_output(policy_id, output_id, force)
    }

    async fn remove_output_from_all(&self, output_id: &str) -> Result<usize, PolicyError> {
        Ok(self.policies.write().await.remove_output(output_id))
    }

    async fn bump_revisions(
        &self,
        output_id: &str,
        is_default: bool,
    ) -> Result<usize, PolicyError> {
        Ok(self
            .policies
            .write()
            .await
            .bump_revisions(output_id, is_default))
    }
}
