//! Centralized constants for the Fleet outputs workspace.
//!
//! This module contains default values used across crates to avoid
//! magic value duplication.

// =============================================================================
// Output Defaults
// =============================================================================

/// Elasticsearch hosts used when neither a cloud URL nor agent hosts are configured.
pub const DEFAULT_ES_HOSTS: &[&str] = &["http://localhost:9200"];

/// Human-chosen id of the bootstrapped default output.
pub const DEFAULT_OUTPUT_ID: &str = "fleet-default-output";

/// Display name of the bootstrapped default output.
pub const DEFAULT_OUTPUT_NAME: &str = "default";

/// Saved-object type name for output records.
pub const OUTPUT_SAVED_OBJECT_TYPE: &str = "ingest-outputs";

/// Page size used when a read must see every record.
pub const SO_SEARCH_LIMIT: usize = 10_000;

// =============================================================================
// Storage Defaults
// =============================================================================

/// File name of the output store inside the data directory.
pub const OUTPUTS_FILE_NAME: &str = "outputs.json";

/// File name of the agent policy store inside the data directory.
pub const POLICIES_FILE_NAME: &str = "agent_policies.json";

/// Application name used to resolve platform directories.
pub const APP_NAME: &str = "fleet-outputs";

// =============================================================================
// Encryption
// =============================================================================

/// Minimum length of the encryption key. Shorter keys are rejected at load time.
pub const MIN_ENCRYPTION_KEY_LENGTH: usize = 32;
