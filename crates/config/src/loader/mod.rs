//! Configuration loader for environment variables and files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables, and a YAML config file.
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Reading the preconfigured outputs list (see the outputs crate).
//! - Encrypting secrets (see `encryption.rs`).
//!
//! Invariants / Assumptions:
//! - Builder methods > environment variables > config file > defaults.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

mod builder;
mod env;
mod error;
mod file;

pub use builder::{ConfigLoader, default_data_dir};
pub use env::env_var_or_none;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
