//! Agent policy registry adapters.

mod file;
mod memory;

pub use file::FilePolicyRegistry;
pub use memory::MemoryPolicyRegistry;

use std::collections::BTreeMap;

use crate::error::PolicyError;
use crate::models::{AgentPolicy, PolicyFilter};

/// Agent policies keyed by id, with the update rules both adapters share.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolicySet {
    policies: BTreeMap<String, AgentPolicy>,
}

impl PolicySet {
    pub fn from_policies(policies: impl IntoIterator<Item = AgentPolicy>) -> Self {
        Self {
            policies: policies
                .into_iter()
                .map(|policy| (policy.id.clone(), policy))
                .collect(),
        }
    }

    pub fn all(&self) -> Vec<AgentPolicy> {
        self.policies.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&AgentPolicy> {
        self.policies.get(id)
    }

    pub fn upsert(&mut self, policy: AgentPolicy) {
        self.policies.insert(policy.id.clone(), policy);
    }

    pub fn list(&self, filter: &PolicyFilter) -> Vec<AgentPolicy> {
        self.policies
            .values()
            .filter(|policy| filter.matches(policy))
            .cloned()
            .collect()
    }

    pub fn update_data_output(
        &mut self,
        policy_id: &str,
        output_id: Option<String>,
        force: bool,
    ) -> Result<(), PolicyError> {
        let policy = self
            .policies
            .get_mut(policy_id)
            .ok_or_else(|| PolicyError::NotFound(policy_id.to_string()))?;
        if policy.is_managed && !force {
            return Err(PolicyError::Managed(policy_id.to_string()));
        }

        policy.data_output_id = output_id;
        policy.revision += 1;
        Ok(())
    }

    pub fn remove_output(&mut self, output_id: &str) -> usize {
        let mut changed = 0;
        for policy in self.policies.values_mut() {
            if !policy.references_output(output_id) {
                continue;
            }
            if policy.data_output_id.as_deref() == Some(output_id) {
                policy.data_output_id = None;
            }
            if policy.monitoring_output_id.as_deref() == Some(output_id) {
                policy.monitoring_output_id = None;
            }
            policy.revision += 1;
            changed += 1;
        }
        changed
    }

    pub fn bump_revisions(&mut self, output_id: &str, is_default: bool) -> usize {
        let mut bumped = 0;
        for policy in self.policies.values_mut() {
            if policy.references_output(output_id)
                || (is_default && policy.data_output_id.is_none())
            {
                policy.revision += 1;
                bumped += 1;
            }
        }
        bumped
    }
}
