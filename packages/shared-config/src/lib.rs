//! Shared configuration types for Vibelist services
//!
//! This crate provides the configuration types used by the API service and
//! by the catalog (Spotify) and generator (Gemini) clients, so that every
//! component reads the same environment variables with the same defaults.

mod database;
mod error;
mod gemini;
mod spotify;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ConfigResult};
pub use gemini::GeminiConfig;
pub use spotify::SpotifyConfig;

use std::env;

/// Common configuration shared between all services
#[derive(Debug, Clone)]
pub struct CommonConfig {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Catalog service configuration
    pub spotify: SpotifyConfig,

    /// Generative text service configuration
    pub gemini: GeminiConfig,

    /// Environment mode (development, staging, production)
    pub environment: Environment,

    /// Log level (from RUST_LOG or LOG_LEVEL)
    pub log_level: String,
}

/// Application environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        })
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl CommonConfig {
    /// Load common configuration from environment variables
    ///
    /// In production the generator API key must be present; other
    /// environments fall back to an empty key so the service can start
    /// against mocks.
    pub fn from_env() -> ConfigResult<Self> {
        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .parse()
            .unwrap_or_default();

        let gemini = GeminiConfig::from_env()?;
        if environment.is_production() && gemini.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "GEMINI_API_KEY must be set in production".to_string(),
            ));
        }

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            spotify: SpotifyConfig::from_env()?,
            gemini,
            environment,
            log_level: env::var("RUST_LOG")
                .or_else(|_| env::var("LOG_LEVEL"))
                .unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Helper function to get a required environment variable
pub fn get_required_env(name: &str) -> ConfigResult<String> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to parse an environment variable into a specific type
pub fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

/// Read a base URL variable, rejecting anything that is not http(s)
pub(crate) fn base_url_env(name: &str, default: &str) -> ConfigResult<String> {
    let raw = get_env_or_default(name, default);
    let trimmed = raw.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(trimmed.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidUrl(name.to_string(), raw)),
    }
}
