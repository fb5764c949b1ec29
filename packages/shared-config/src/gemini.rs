//! Gemini generative text configuration types

use crate::{base_url_env, get_env_or_default, parse_env, ConfigResult};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini service configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    pub api_url: String,

    /// API key, sent as a header on every request
    pub api_key: String,

    /// Model used for recommendation generation
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum output tokens for generation
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 2.0)
    pub temperature: f32,
}

impl GeminiConfig {
    /// Load Gemini configuration from environment variables
    ///
    /// A missing `GEMINI_API_KEY` yields an empty key here; production
    /// enforcement happens in [`crate::CommonConfig::from_env`].
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_url: base_url_env("GEMINI_API_URL", DEFAULT_API_URL)?,
            api_key: get_env_or_default("GEMINI_API_KEY", ""),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_MODEL),
            timeout_secs: parse_env("GEMINI_TIMEOUT", 60)?,
            max_tokens: parse_env("GEMINI_MAX_TOKENS", 2048)?,
            temperature: parse_env("GEMINI_TEMPERATURE", 0.7)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
            api_key: "test-key".to_string(),
            ..Self::default()
        }
    }

    /// Get the full URL for the streaming generation endpoint
    pub fn stream_generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Get the full URL for the model metadata endpoint
    pub fn model_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.api_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn test_endpoint_urls() {
        let config = GeminiConfig::with_url("http://localhost:8089/");
        assert_eq!(
            config.stream_generate_url(),
            "http://localhost:8089/v1beta/models/gemini-2.0-flash:streamGenerateContent"
        );
        assert_eq!(
            config.model_url(),
            "http://localhost:8089/v1beta/models/gemini-2.0-flash"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = GeminiConfig::default();
        config.api_key = "super-secret".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_env_reads_model() {
        temp_env::with_vars(
            [
                ("GEMINI_MODEL", Some("gemini-1.5-pro")),
                ("GEMINI_API_KEY", Some("abc")),
                ("GEMINI_API_URL", None),
            ],
            || {
                let config = GeminiConfig::from_env().unwrap();
                assert_eq!(config.model, "gemini-1.5-pro");
                assert_eq!(config.api_key, "abc");
            },
        );
    }
}
