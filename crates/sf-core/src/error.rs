//! Error types for sf-core

use thiserror::Error;

/// Core error type for Semflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Identifier does not parse as a semantic version
    #[error("[E001] Malformed version '{input}': {message}")]
    MalformedVersion { input: String, message: String },

    /// E002: Configuration file not found
    #[error("[E002] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E003: Failed to parse configuration file
    #[error("[E003] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// E004: Invalid configuration value
    #[error("[E004] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E005: IO error
    #[error("[E005] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E006: IO error with file path context
    #[error("[E006] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
