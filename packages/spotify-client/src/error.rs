//! Spotify Web API error types

use thiserror::Error;

/// Spotify Web API client errors
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse Spotify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The access token was rejected
    #[error("Spotify rejected the access token: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Spotify
    #[error("Rate limited by Spotify API (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// Request timeout
    #[error("Request to Spotify timed out")]
    Timeout,

    /// Spotify API returned a non-success status
    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl SpotifyError {
    /// HTTP status reported by Spotify, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::Unauthorized(_) => Some(401),
            SpotifyError::NotFound(_) => Some(404),
            SpotifyError::RateLimited { .. } => Some(429),
            SpotifyError::Api { status, .. } => Some(*status),
            SpotifyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for Spotify operations
pub type SpotifyResult<T> = Result<T, SpotifyError>;
