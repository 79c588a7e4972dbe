//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `OutputError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use fleet_outputs::{OutputError, PolicyError, PreconfigurationError, StoreError};

/// Structured exit codes for fleet-outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Output or policy not found.
    ///
    /// Scripts should verify identifiers or create the missing output.
    NotFound = 4,

    /// Validation error - invalid output payload or configuration.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Permission denied - preconfigured or default output protection.
    PermissionDenied = 6,

    /// Conflict - the output already exists or changed concurrently.
    ///
    /// Scripts may re-read and retry.
    Conflict = 7,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&PolicyError> for ExitCode {
    fn from(err: &PolicyError) -> Self {
        match err {
            PolicyError::NotFound(_) => ExitCode::NotFound,
            PolicyError::Managed(_) => ExitCode::ValidationError,
            PolicyError::Storage(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&OutputError> for ExitCode {
    fn from(err: &OutputError) -> Self {
        match err {
            OutputError::NotFound(_) => ExitCode::NotFound,
            OutputError::InvalidOutput(_)
            | OutputError::EncryptionRequired(_)
            | OutputError::InvalidConfigYaml(_) => ExitCode::ValidationError,
            OutputError::Unauthorized(_) => ExitCode::PermissionDenied,
            OutputError::Store(StoreError::NotFound { .. }) => ExitCode::NotFound,
            OutputError::Store(
                StoreError::AlreadyExists { .. } | StoreError::VersionConflict { .. },
            ) => ExitCode::Conflict,
            OutputError::Store(_) => ExitCode::GeneralError,
            OutputError::Policy(e) => ExitCode::from(e),
        }
    }
}

impl From<&PreconfigurationError> for ExitCode {
    fn from(err: &PreconfigurationError) -> Self {
        match err {
            PreconfigurationError::Output(e) => ExitCode::from(e),
            PreconfigurationError::Parse { .. } | PreconfigurationError::Invalid(_) => {
                ExitCode::ValidationError
            }
            PreconfigurationError::Read { .. } => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(e) = cause.downcast_ref::<OutputError>() {
                return ExitCode::from(e);
            }
            if let Some(e) = cause.downcast_ref::<PreconfigurationError>() {
                return ExitCode::from(e);
            }
            if let Some(e) = cause.downcast_ref::<PolicyError>() {
                return ExitCode::from(e);
            }
        }
        ExitCode::GeneralError
    }
}
