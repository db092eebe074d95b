//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// Required settings are unset. Each entry names the env var to set.
    #[error("Missing required settings: {}", missing.join(", "))]
    NotConfigured { missing: Vec<String> },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The entity descriptor file does not exist.
    #[error("Entity config file not found: {}", path.display())]
    EntityFileMissing { path: PathBuf },

    /// The entity descriptor file has no entry for the requested kind.
    #[error("No entity config for kind '{kind}' in {}", path.display())]
    EntityNotConfigured { kind: String, path: PathBuf },
}
