//! Agent policies as seen by the output service.
//!
//! Policies live outside this crate; they reference outputs by id only.

use serde::{Deserialize, Serialize};

/// Package name of the APM integration.
pub const APM_PACKAGE: &str = "apm";

/// Package name of the Fleet Server integration.
pub const FLEET_SERVER_PACKAGE: &str = "fleet_server";

/// An agent policy and the outputs it references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPolicy {
    pub id: String,
    pub name: String,
    /// Explicit data output; `None` follows the default output.
    pub data_output_id: Option<String>,
    /// Explicit monitoring output; `None` follows the default monitoring output.
    pub monitoring_output_id: Option<String>,
    /// Names of the integration packages installed on the policy.
    pub package_policies: Vec<String>,
    /// Hosted policies only change through forced updates.
    pub is_managed: bool,
    pub revision: u64,
}

impl AgentPolicy {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            revision: 1,
            ..Self::default()
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_policies.push(package.into());
        self
    }

    pub fn with_data_output(mut self, output_id: impl Into<String>) -> Self {
        self.data_output_id = Some(output_id.into());
        self
    }

    pub fn managed(mut self) -> Self {
        self.is_managed = true;
        self
    }

    pub fn with_monitoring_output(mut self, output_id: impl Into<String>) -> Self {
        self.monitoring_output_id = Some(output_id.into());
        self
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.package_policies.iter().any(|p| p == package)
    }

    /// Whether the policy references `output_id` for data or monitoring.
    pub fn references_output(&self, output_id: &str) -> bool {
        self.data_output_id.as_deref() == Some(output_id)
            || self.monitoring_output_id.as_deref() == Some(output_id)
    }
}

/// Selection of agent policies by the data output they use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyFilter {
    /// Every policy.
    All,
    /// Policies without an explicit data output.
    FollowingDefault,
    /// Policies whose data output is this id.
    DataOutput(String),
    /// Policies whose data output is this id or that follow the default.
    DataOutputOrDefault(String),
}

impl PolicyFilter {
    /// Policies that would ship data to `output_id` (if given), plus the ones
    /// following the default when the output is or becomes the default.
    ///
    /// Returns `None` when no policy can be affected.
    pub fn for_output(output_id: Option<&str>, is_default: bool) -> Option<Self> {
        match (output_id, is_default) {
            (Some(id), true) => Some(Self::DataOutputOrDefault(id.to_string())),
            (Some(id), false) => Some(Self::DataOutput(id.to_string())),
            (None, true) => Some(Self::FollowingDefault),
            (None, false) => None,
        }
    }

    pub fn matches(&self, policy: &AgentPolicy) -> bool {
        let data_output = policy.data_output_id.as_deref();
        match self {
            Self::All => true,
            Self::FollowingDefault => data_output.is_none(),
            Self::DataOutput(id) => data_output == Some(id.as_str()),
            Self::DataOutputOrDefault(id) => data_output.is_none() || data_output == Some(id.as_str()),
        }
    }
}
