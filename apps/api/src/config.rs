//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use vibelist_shared_config::{
    CommonConfig, DatabaseConfig, Environment, GeminiConfig, SpotifyConfig,
};

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Configuration shared with the client crates
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// CORS allowed origins, from `CORS_ORIGINS` plus `FRONTEND_URL`
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode this requires:
    /// - `DATABASE_URL`: must be explicitly set (no local default)
    /// - `GEMINI_API_KEY`: must be explicitly set
    ///
    /// Development and staging fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        if environment.is_production() {
            Self::validate_required("DATABASE_URL", "your PostgreSQL connection string")?;
            Self::validate_required("GEMINI_API_KEY", "your Gemini API key")?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            cors_allowed_origins: Self::load_cors_origins(),
        })
    }

    fn validate_required(name: &str, what: &str) -> Result<()> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(()),
            _ => bail!(
                "{} environment variable is required in production. Please set {}.",
                name,
                what
            ),
        }
    }

    /// Comma separated `CORS_ORIGINS`, with `FRONTEND_URL` appended when it
    /// is not already listed
    fn load_cors_origins() -> Option<Vec<String>> {
        let mut origins: Vec<String> = env::var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if let Ok(frontend) = env::var("FRONTEND_URL") {
            let frontend = frontend.trim().trim_end_matches('/').to_string();
            if !frontend.is_empty() && !origins.contains(&frontend) {
                origins.push(frontend);
            }
        }

        (!origins.is_empty()).then_some(origins)
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get Spotify configuration
    pub fn spotify(&self) -> &SpotifyConfig {
        &self.common.spotify
    }

    /// Get Gemini configuration
    pub fn gemini(&self) -> &GeminiConfig {
        &self.common.gemini
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
