//! Error types for host-side model and config loading.
//!
//! Inference itself never fails; only reading parameters and configuration
//! from disk can.

use std::path::PathBuf;

/// Errors from reading a `policy_weights.json` export.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model exported with {found} fractional bits, expected {expected}")]
    PrecisionMismatch { expected: u32, found: u32 },

    #[error("{tensor}: expected {expected} rows/values, found {found}")]
    ShapeMismatch { tensor: &'static str, expected: usize, found: usize },

    #[error("{tensor} row {row}: expected {expected} values, found {found}")]
    RowMismatch { tensor: &'static str, row: usize, expected: usize, found: usize },

    #[error("{tensor}[{index}] = {value} does not fit the fixed-point container")]
    ValueOutOfRange { tensor: &'static str, index: usize, value: i64 },
}

/// Errors from loading a [`crate::config::PolicyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
