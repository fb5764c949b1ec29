//! Spotify Web API configuration types

use crate::{base_url_env, parse_env, ConfigResult};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify catalog service configuration
///
/// Access tokens are not part of this configuration. They belong to the
/// caller's session and travel with each request.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    /// Base URL of the Web API, including the version segment
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Number of top tracks and top artists requested for a listening profile
    pub top_items_limit: u32,

    /// Whether created playlists are public
    pub playlist_public: bool,

    /// Number of candidates resolved concurrently
    pub resolve_concurrency: usize,
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_url: base_url_env("SPOTIFY_API_URL", DEFAULT_API_URL)?,
            timeout_secs: parse_env("SPOTIFY_TIMEOUT", 10)?,
            top_items_limit: parse_env::<u32>("SPOTIFY_TOP_ITEMS_LIMIT", 20)?.clamp(1, 50),
            playlist_public: parse_env("SPOTIFY_PLAYLIST_PUBLIC", true)?,
            resolve_concurrency: parse_env::<usize>("SPOTIFY_RESOLVE_CONCURRENCY", 1)?.max(1),
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
            ..Self::default()
        }
    }

    /// Build the full URL for an API path such as `/me/top/tracks`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            top_items_limit: 20,
            playlist_public: true,
            resolve_concurrency: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpotifyConfig::default();
        assert_eq!(config.api_url, "https://api.spotify.com/v1");
        assert_eq!(config.top_items_limit, 20);
        assert!(config.playlist_public);
        assert_eq!(config.resolve_concurrency, 1);
    }

    #[test]
    fn test_api_url_joins_paths() {
        let config = SpotifyConfig::with_url("http://localhost:9000/");
        assert_eq!(config.api_url("/me/top/tracks"), "http://localhost:9000/me/top/tracks");
        assert_eq!(config.api_url("search"), "http://localhost:9000/search");
    }

    #[test]
    fn test_from_env_clamps_limits() {
        temp_env::with_vars(
            [
                ("SPOTIFY_TOP_ITEMS_LIMIT", Some("500")),
                ("SPOTIFY_RESOLVE_CONCURRENCY", Some("0")),
                ("SPOTIFY_API_URL", None),
            ],
            || {
                let config = SpotifyConfig::from_env().unwrap();
                assert_eq!(config.top_items_limit, 50);
                assert_eq!(config.resolve_concurrency, 1);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_boolean() {
        temp_env::with_var("SPOTIFY_PLAYLIST_PUBLIC", Some("maybe"), || {
            assert!(SpotifyConfig::from_env().is_err());
        });
    }
}
