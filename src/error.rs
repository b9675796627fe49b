//! Error types for loading and configuring twin models
//!
//! Validation defects are not errors in this sense; they live in
//! [`crate::validation::Defects`] and are never propagated with `?`.

use thiserror::Error;

/// Result type for twin model operations
pub type Result<T> = std::result::Result<T, TwinError>;

/// Decode, I/O and configuration failures
#[derive(Error, Debug)]
pub enum TwinError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Invalid DTMI '{id}': {reason}")]
    InvalidDtmi { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
