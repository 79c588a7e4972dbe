//! JSON file agent policy registry.
//!
//! Invariants:
//! - Writes are atomic (temp file + rename).
//! - Policies are written in id order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::PolicySet;
use crate::error::PolicyError;
use crate::models::{AgentPolicy, PolicyFilter};
use crate::ports::PolicyRegistry;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PoliciesDocument {
    #[serde(default)]
    policies: Vec<AgentPolicy>,
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> PolicyError {
    PolicyError::Storage(format!("{}: {e}", path.display()))
}

/// Policy registry persisted as a JSON file.
#[derive(Debug)]
pub struct FilePolicyRegistry {
    path: PathBuf,
    policies: Mutex<PolicySet>,
}

impl FilePolicyRegistry {
    /// Open (or start) the registry at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PolicyError> {
        let path = path.into();
        let document = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => PoliciesDocument::default(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| storage_error(&path, e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PoliciesDocument::default(),
            Err(e) => return Err(storage_error(&path, e)),
        };

        Ok(Self {
            policies: Mutex::new(PolicySet::from_policies(document.policies)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add or replace a policy.
    pub async fn insert(&self, policy: AgentPolicy) -> Result<(), PolicyError> {
        self.mutate(|set| {
            set.upsert(policy);
            Ok(())
        })
        .await
    }

    pub async fn all(&self) -> Vec<AgentPolicy> {
        self.policies.lock().await.all()
    }

    fn persist(&self, set: &PolicySet) -> Result<(), PolicyError> {
        let document = PoliciesDocument {
            policies: set.all(),
        };
        let content =
            serde_json::to_string_pretty(&document).map_err(|e| storage_error(&self.path, e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|e| storage_error(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }

    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut PolicySet) -> Result<T, PolicyError>,
    ) -> Result<T, PolicyError> {
        let mut policies = self.policies.lock().await;
        let mut next = policies.clone();
        let result = change(&mut next)?;
        self.persist(&next)?;
        *policies = next;
        Ok(result)
    }
}

#[async_trait]
impl PolicyRegistry for FilePolicyRegistry {
    async fn list_policies(&self, filter: PolicyFilter) -> Result<Vec<AgentPolicy>, PolicyError> {
        Ok(self.policies.lock().await.list(&filter))
    }

    async fn update_policy_data_output(
        &self,
        policy_id: &str,
        output_id: Option<String>,
        force: bool,
    ) -> Result<(), PolicyError> {
        self.mutate(|set| set.update_data_output(policy_id, output_id, force))
            .await
    }

    async fn remove_output_from_all(&self, output_id: &str) -> Result<usize, PolicyError> {
        self.mutate(|set| Ok(set.remove_output(output_id))).await
    }

    async fn bump_revisions(
        &self,
        output_id: &str,
        is_default: bool,
    ) -> Result<usize, PolicyError> {
        self.mutate(|set| Ok(set.bump_revisions(output_id, is_default)))
            .await
    }
}
