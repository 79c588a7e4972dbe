//! Output models.
//!
//! `Output` is the resolved view handed to callers. `OutputAttributes` is what
//! the store persists: identical except that `ssl` is an opaque JSON string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OutputError, StoreError};

/// Destination kind of an output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    #[default]
    Elasticsearch,
    Logstash,
}

impl OutputType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::Logstash => "logstash",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "elasticsearch" => Ok(Self::Elasticsearch),
            "logstash" => Ok(Self::Logstash),
            other => Err(format!(
                "unknown output type '{other}' (expected elasticsearch or logstash)"
            )),
        }
    }
}

/// Field names of an output, as used by `allow_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputField {
    Name,
    #[serde(rename = "type")]
    Type,
    Hosts,
    IsDefault,
    IsDefaultMonitoring,
    IsPreconfigured,
    AllowEdit,
    CaSha256,
    CaTrustedFingerprint,
    ConfigYaml,
    Ssl,
    ProxyId,
    Shipper,
}

impl OutputField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::Hosts => "hosts",
            Self::IsDefault => "is_default",
            Self::IsDefaultMonitoring => "is_default_monitoring",
            Self::IsPreconfigured => "is_preconfigured",
            Self::AllowEdit => "allow_edit",
            Self::CaSha256 => "ca_sha256",
            Self::CaTrustedFingerprint => "ca_trusted_fingerprint",
            Self::ConfigYaml => "config_yaml",
            Self::Ssl => "ssl",
            Self::ProxyId => "proxy_id",
            Self::Shipper => "shipper",
        }
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS settings for Logstash outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificate_authorities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Shipper (disk queue / batching) settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipperConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_queue_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_queue_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_queue_max_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_queue_encryption_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_queue_compression_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadbalance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_queue_events: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_flush_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_bytes: Option<u64>,
}

/// A named destination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Canonical id (hyphenated UUID).
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_default_monitoring: bool,
    #[serde(default)]
    pub is_preconfigured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_edit: Vec<OutputField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_trusted_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_yaml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper: Option<ShipperConfig>,
}

impl Output {
    /// Resolve a stored record, parsing the `ssl` blob.
    pub fn from_saved(saved: SavedOutput) -> Result<Self, OutputError> {
        let SavedOutput { id, attributes, .. } = saved;
        let ssl = attributes
            .ssl
            .as_deref()
            .map(serde_json::from_str::<SslConfig>)
            .transpose()
            .map_err(|e| {
                StoreError::Serialization(format!("output {id} has an unreadable ssl field: {e}"))
            })?;

        Ok(Self {
            id,
            name: attributes.name,
            output_type: attributes.output_type,
            hosts: attributes.hosts,
            is_default: attributes.is_default,
            is_default_monitoring: attributes.is_default_monitoring,
            is_preconfigured: attributes.is_preconfigured,
            allow_edit: attributes.allow_edit,
            ca_sha256: attributes.ca_sha256,
            ca_trusted_fingerprint: attributes.ca_trusted_fingerprint,
            config_yaml: attributes.config_yaml,
            ssl,
            proxy_id: attributes.proxy_id,
            shipper: attributes.shipper,
        })
    }

    /// Whether `field` may be changed through the runtime API.
    pub fn allows_edit(&self, field: OutputField) -> bool {
        !self.is_preconfigured || self.allow_edit.contains(&field)
    }
}

/// Payload for creating an output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOutput {
    pub name: String,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub hosts: Vec<String>,
    pub is_default: bool,
    pub is_default_monitoring: bool,
    pub is_preconfigured: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allow_edit: Vec<OutputField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_trusted_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_yaml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper: Option<ShipperConfig>,
}

impl NewOutput {
    /// Minimal payload for an output of the given type.
    pub fn new(name: impl Into<String>, output_type: OutputType, hosts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            output_type,
            hosts,
            ..Self::default()
        }
    }
}

impl From<Output> for NewOutput {
    fn from(output: Output) -> Self {
        Self {
            name: output.name,
            output_type: output.output_type,
            hosts: output.hosts,
            is_default: output.is_default,
            is_default_monitoring: output.is_default_monitoring,
            is_preconfigured: output.is_preconfigured,
            allow_edit: output.allow_edit,
            ca_sha256: output.ca_sha256,
            ca_trusted_fingerprint: output.ca_trusted_fingerprint,
            config_yaml: output.config_yaml,
            ssl: output.ssl,
            proxy_id: output.proxy_id,
            shipper: output.shipper,
        }
    }
}

/// Persisted attribute set of an output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputAttributes {
    pub name: String,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub hosts: Vec<String>,
    pub is_default: bool,
    pub is_default_monitoring: bool,
    pub is_preconfigured: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allow_edit: Vec<OutputField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_trusted_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_yaml: Option<String>,
    /// Serialized [`SslConfig`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper: Option<ShipperConfig>,
}

impl OutputAttributes {
    /// Build the persisted form of a create payload.
    pub fn from_new(output: NewOutput) -> Result<Self, OutputError> {
        Ok(Self {
            ssl: output.ssl.as_ref().map(serialize_ssl).transpose()?,
            name: output.name,
            output_type: output.output_type,
            hosts: output.hosts,
            is_default: output.is_default,
            is_default_monitoring: output.is_default_monitoring,
            is_preconfigured: output.is_preconfigured,
            allow_edit: output.allow_edit,
            ca_sha256: output.ca_sha256,
            ca_trusted_fingerprint: output.ca_trusted_fingerprint,
            config_yaml: output.config_yaml,
            proxy_id: output.proxy_id,
            shipper: output.shipper,
        })
    }
}

pub(crate) fn serialize_ssl(ssl: &SslConfig) -> Result<String, OutputError> {
    serde_json::to_string(ssl)
        .map_err(|e| StoreError::Serialization(format!("unable to serialize ssl: {e}")).into())
}

/// A stored output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOutput {
    pub id: String,
    /// Optimistic concurrency version, bumped on every write.
    pub version: u64,
    pub attributes: OutputAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(ssl: Option<&str>) -> SavedOutput {
        SavedOutput {
            id: "abc".to_string(),
            version: 3,
            attributes: OutputAttributes {
                name: "ls".to_string(),
                output_type: OutputType::Logstash,
                hosts: vec!["logstash:5044".to_string()],
                ssl: ssl.map(str::to_string),
                ..OutputAttributes::default()
            },
        }
    }

    #[test]
    fn test_ssl_blob_is_parsed_on_read() {
        let output =
            Output::from_saved(saved(Some(r#"{"certificate":"cert","key":"key"}"#))).unwrap();
        let ssl = output.ssl.unwrap();
        assert_eq!(ssl.certificate.as_deref(), Some("cert"));
        assert_eq!(ssl.key.as_deref(), Some("key"));
        assert!(ssl.certificate_authorities.is_empty());
    }

    #[test]
    fn test_unreadable_ssl_blob_is_a_serialization_error() {
        let err = Output::from_saved(saved(Some("not json"))).unwrap_err();
        assert!(matches!(err, OutputError::Store(StoreError::Serialization(_))));
    }

    #[test]
    fn test_output_type_parsing() {
        assert_eq!("Logstash".parse::<OutputType>().unwrap(), OutputType::Logstash);
        assert_eq!(
            "elasticsearch".parse::<OutputType>().unwrap(),
            OutputType::Elasticsearch
        );
        assert!("kafka".parse::<OutputType>().is_err());
    }

    #[test]
    fn test_output_field_names_match_serde() {
        let json = serde_json::to_string(&vec![OutputField::Type, OutputField::CaSha256]).unwrap();
        assert_eq!(json, r#"["type","ca_sha256"]"#);
        assert_eq!(OutputField::IsDefaultMonitoring.as_str(), "is_default_monitoring");
    }

    #[test]
    fn test_new_output_deserializes_with_defaults() {
        let output: NewOutput =
            serde_json::from_str(r#"{"name":"es","type":"elasticsearch","hosts":["http://es:9200"]}"#)
                .unwrap();
        assert!(!output.is_default);
        assert!(output.allow_edit.is_empty());
        assert!(output.ssl.is_none());
    }
}
