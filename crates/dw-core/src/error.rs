//! Error types for dw-core

use thiserror::Error;

/// Core error type for Driftwood
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migration definition listing could not be read
    #[error("[E003] Migration source unavailable at {location}: {message}")]
    SourceUnavailable { location: String, message: String },

    /// E004: A named definition does not exist in the source
    #[error("[E004] Migration definition not found: {name}")]
    DefinitionNotFound { name: String },

    /// E005: IO error with file path context
    #[error("[E005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E006: YAML parse error
    #[error("[E006] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
