use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading plugin configuration files.
///
/// The bundler hooks themselves never raise: every decision path in
/// resolution and loading degrades to pass-through instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
