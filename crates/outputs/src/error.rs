//! Error types for the output service and its ports.

use std::io::ErrorKind;
use thiserror::Error;

/// Result type alias for output service operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Errors raised by an [`OutputStore`](crate::ports::OutputStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this id.
    #[error("Saved object [{object_type}/{id}] not found")]
    NotFound { object_type: String, id: String },

    /// A record with this id exists and overwrite was not requested.
    #[error("Saved object [{object_type}/{id}] conflict: already exists")]
    AlreadyExists { object_type: String, id: String },

    /// The record changed since it was read.
    #[error("Saved object [{object_type}/{id}] conflict: expected version {expected}, found {actual}")]
    VersionConflict {
        object_type: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A secret could not be sealed or opened.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The backing file could not be read or written.
    #[error("Store I/O error at {path}: {kind}")]
    Io { path: String, kind: ErrorKind },
}

impl StoreError {
    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyExists { .. } | Self::VersionConflict { .. } => 409,
            Self::Serialization(_) | Self::Encryption(_) | Self::Io { .. } => 500,
        }
    }
}

/// Errors raised by a [`PolicyRegistry`](crate::ports::PolicyRegistry) implementation.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// No agent policy with this id.
    #[error("Agent policy {0} not found")]
    NotFound(String),

    /// The policy is managed and the change was not forced.
    #[error("Cannot update integrations of hosted agent policy {0}")]
    Managed(String),

    /// The registry could not be read or written.
    #[error("Agent policy storage error: {0}")]
    Storage(String),
}

impl PolicyError {
    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Managed(_) => 400,
            Self::Storage(_) => 500,
        }
    }
}

/// Errors that can occur during output service operations.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The referenced output does not exist.
    #[error("Output {0} not found")]
    NotFound(String),

    /// The output conflicts with the policies that would use it.
    #[error("{0}")]
    InvalidOutput(String),

    /// A protected output was mutated outside of static configuration.
    #[error("{0}")]
    Unauthorized(String),

    /// The output holds secrets but the store cannot encrypt them.
    #[error("{0}")]
    EncryptionRequired(String),

    /// `config_yaml` is not valid YAML.
    #[error("Invalid config_yaml: {0}")]
    InvalidConfigYaml(String),

    /// Error from the output store, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error from the policy registry, passed through unchanged.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl OutputError {
    /// HTTP-equivalent status code for route layers.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidOutput(_) | Self::EncryptionRequired(_) | Self::InvalidConfigYaml(_) => {
                400
            }
            Self::Unauthorized(_) => 403,
            Self::Store(e) => e.status_code(),
            Self::Policy(e) => e.status_code(),
        }
    }

    /// Check if this error means the output (or a store record) is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Store(StoreError::NotFound { .. })
        )
    }

    /// Check if this error is an optimistic-concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::VersionConflict { .. } | StoreError::AlreadyExists { .. })
        )
    }
}
