//! Partial updates with explicit null-to-clear semantics.
//!
//! In a JSON or YAML patch a missing key leaves the field unchanged, `null`
//! clears it and any other value replaces it. Fields that cannot be cleared
//! are plain `Option`s.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::output::{
    NewOutput, Output, OutputAttributes, OutputField, OutputType, ShipperConfig, SslConfig,
    serialize_ssl,
};
use crate::error::OutputError;

/// Tri-state update of a clearable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    /// Leave the field unchanged.
    #[default]
    Absent,
    /// Clear the field.
    Clear,
    /// Replace the field.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// `None` when absent, otherwise the new value of the field.
    pub fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Self::Absent => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }

    /// Apply the patch to a stored value.
    pub fn apply(self, current: &mut Option<T>) {
        match self {
            Self::Absent => {}
            Self::Clear => *current = None,
            Self::Set(value) => *current = Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Clear => Patch::Clear,
            Self::Set(value) => Patch::Set(f(value)),
        }
    }
}

impl<T: PartialEq> Patch<T> {
    /// Whether applying the patch would change `current`. Clear equals an unset value.
    pub fn differs_from(&self, current: Option<&T>) -> bool {
        match self.as_update() {
            None => false,
            Some(new) => new != current,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent | Self::Clear => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

/// Partial update of an output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub output_type: Option<OutputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default_monitoring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preconfigured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_edit: Option<Vec<OutputField>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ca_sha256: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ca_trusted_fingerprint: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub config_yaml: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ssl: Patch<SslConfig>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub proxy_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub shipper: Patch<ShipperConfig>,
}

fn option_differs<T: PartialEq>(new: Option<&T>, current: &T) -> bool {
    new.is_some_and(|new| new != current)
}

impl OutputPatch {
    /// Patch that only changes `is_default`.
    pub fn is_default(value: bool) -> Self {
        Self {
            is_default: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only changes `is_default_monitoring`.
    pub fn is_default_monitoring(value: bool) -> Self {
        Self {
            is_default_monitoring: Some(value),
            ..Self::default()
        }
    }

    /// Fields present in the patch whose value differs from `current`, in
    /// declaration order.
    pub fn changed_fields(&self, current: &Output) -> Vec<OutputField> {
        let candidates = [
            (OutputField::Name, option_differs(self.name.as_ref(), &current.name)),
            (
                OutputField::Type,
                option_differs(self.output_type.as_ref(), &current.output_type),
            ),
            (OutputField::Hosts, option_differs(self.hosts.as_ref(), &current.hosts)),
            (
                OutputField::IsDefault,
                option_differs(self.is_default.as_ref(), &current.is_default),
            ),
            (
                OutputField::IsDefaultMonitoring,
                option_differs(
                    self.is_default_monitoring.as_ref(),
                    &current.is_default_monitoring,
                ),
            ),
            (
                OutputField::IsPreconfigured,
                option_differs(self.is_preconfigured.as_ref(), &current.is_preconfigured),
            ),
            (
                OutputField::AllowEdit,
                option_differs(self.allow_edit.as_ref(), &current.allow_edit),
            ),
            (
                OutputField::CaSha256,
                self.ca_sha256.differs_from(current.ca_sha256.as_ref()),
            ),
            (
                OutputField::CaTrustedFingerprint,
                self.ca_trusted_fingerprint
                    .differs_from(current.ca_trusted_fingerprint.as_ref()),
            ),
            (
                OutputField::ConfigYaml,
                self.config_yaml.differs_from(current.config_yaml.as_ref()),
            ),
            (OutputField::Ssl, self.ssl.differs_from(current.ssl.as_ref())),
            (
                OutputField::ProxyId,
                self.proxy_id.differs_from(current.proxy_id.as_ref()),
            ),
            (
                OutputField::Shipper,
                self.shipper.differs_from(current.shipper.as_ref()),
            ),
        ];

        candidates
            .into_iter()
            .filter_map(|(field, changed)| changed.then_some(field))
            .collect()
    }

    /// Whether the patch touches no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the patch into stored attributes.
    pub fn apply_to(self, attributes: &mut OutputAttributes) -> Result<(), OutputError> {
        if let Some(name) = self.name {
            attributes.name = name;
        }
        if let Some(output_type) = self.output_type {
            attributes.output_type = output_type;
        }
        if let Some(hosts) = self.hosts {
            attributes.hosts = hosts;
        }
        if let Some(is_default) = self.is_default {
            attributes.is_default = is_default;
        }
        if let Some(is_default_monitoring) = self.is_default_monitoring {
            attributes.is_default_monitoring = is_default_monitoring;
        }
        if let Some(is_preconfigured) = self.is_preconfigured {
            attributes.is_preconfigured = is_preconfigured;
        }
        if let Some(allow_edit) = self.allow_edit {
            attributes.allow_edit = allow_edit;
        }
        self.ca_sha256.apply(&mut attributes.ca_sha256);
        self.ca_trusted_fingerprint
            .apply(&mut attributes.ca_trusted_fingerprint);
        self.config_yaml.apply(&mut attributes.config_yaml);
        match self.ssl {
            Patch::Absent => {}
            Patch::Clear => attributes.ssl = None,
            Patch::Set(ssl) => attributes.ssl = Some(serialize_ssl(&ssl)?),
        }
        self.proxy_id.apply(&mut attributes.proxy_id);
        self.shipper.apply(&mut attributes.shipper);
        Ok(())
    }
}

impl From<NewOutput> for OutputPatch {
    /// A patch that sets every field of `output`, clearing the ones it leaves unset.
    fn from(output: NewOutput) -> Self {
        Self {
            name: Some(output.name),
            output_type: Some(output.output_type),
            hosts: Some(output.hosts),
            is_default: Some(output.is_default),
            is_default_monitoring: Some(output.is_default_monitoring),
            is_preconfigured: Some(output.is_preconfigured),
            allow_edit: Some(output.allow_edit),
            ca_sha256: output.ca_sha256.into(),
            ca_trusted_fingerprint: output.ca_trusted_fingerprint.into(),
            config_yaml: output.config_yaml.into(),
            ssl: output.ssl.into(),
            proxy_id: output.proxy_id.into(),
            shipper: output.shipper.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> Output {
        Output {
            id: "abc".to_string(),
            name: "es".to_string(),
            output_type: OutputType::Elasticsearch,
            hosts: vec!["http://es:9200".to_string()],
            is_default: true,
            is_default_monitoring: false,
            is_preconfigured: true,
            allow_edit: vec![],
            ca_sha256: Some("fp".to_string()),
            ca_trusted_fingerprint: None,
            config_yaml: None,
            ssl: None,
            proxy_id: None,
            shipper: None,
        }
    }

    #[test]
    fn test_missing_null_and_value_deserialize_to_three_states() {
        let patch: OutputPatch =
            serde_json::from_str(r#"{"ca_sha256":null,"proxy_id":"proxy-1"}"#).unwrap();
        assert_eq!(patch.ca_sha256, Patch::Clear);
        assert_eq!(patch.proxy_id, Patch::Set("proxy-1".to_string()));
        assert_eq!(patch.config_yaml, Patch::Absent);
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let patch = OutputPatch {
            ca_sha256: Patch::Clear,
            ..OutputPatch::is_default(false)
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"is_default":false,"ca_sha256":null}"#);
    }

    #[test]
    fn test_changed_fields_ignores_equal_values() {
        let current = output();
        let patch = OutputPatch {
            name: Some("es".to_string()),
            hosts: Some(vec!["http://es:9200".to_string()]),
            is_default: Some(true),
            ca_trusted_fingerprint: Patch::Clear,
            ..OutputPatch::default()
        };
        assert!(patch.changed_fields(&current).is_empty());
    }

    #[test]
    fn test_changed_fields_reports_differences() {
        let current = output();
        let patch = OutputPatch {
            hosts: Some(vec!["http://other:9200".to_string()]),
            ca_sha256: Patch::Clear,
            proxy_id: Patch::Set("p".to_string()),
            ..OutputPatch::default()
        };
        assert_eq!(
            patch.changed_fields(&current),
            vec![OutputField::Hosts, OutputField::CaSha256, OutputField::ProxyId]
        );
    }

    #[test]
    fn test_apply_to_merges_and_clears() {
        let mut attributes = OutputAttributes {
            name: "es".to_string(),
            ca_sha256: Some("fp".to_string()),
            proxy_id: Some("p".to_string()),
            ..OutputAttributes::default()
        };
        let patch = OutputPatch {
            name: Some("renamed".to_string()),
            ca_sha256: Patch::Clear,
            ssl: Patch::Set(SslConfig {
                certificate: Some("cert".to_string()),
                ..SslConfig::default()
            }),
            ..OutputPatch::default()
        };
        patch.apply_to(&mut attributes).unwrap();

        assert_eq!(attributes.name, "renamed");
        assert_eq!(attributes.ca_sha256, None);
        assert_eq!(attributes.proxy_id.as_deref(), Some("p"));
        assert_eq!(attributes.ssl.as_deref(), Some(r#"{"certificate":"cert"}"#));
    }
}
