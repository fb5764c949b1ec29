//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required environment variable
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is present but could not be parsed
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Base URL is not an http(s) URL
    #[error("invalid URL format for {0}: {1}")]
    InvalidUrl(String, String),

    /// Cross-field validation failed (e.g. production without an API key)
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
