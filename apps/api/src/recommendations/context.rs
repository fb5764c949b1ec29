//! Per-request session context
//!
//! The catalog token travels with the request that owns it. Nothing in the
//! pipeline keeps a token beyond the run it was passed to.

use vibelist_spotify_client::AccessToken;

use super::{RecommendationError, RecommendationResult};

/// Identity and credentials of the caller for one pipeline run
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: AccessToken,
    pub spotify_user_id: String,
}

impl SessionContext {
    pub fn new(token: AccessToken, spotify_user_id: impl Into<String>) -> Self {
        Self {
            token,
            spotify_user_id: spotify_user_id.into(),
        }
    }

    /// Reject a context that cannot identify or authenticate the caller
    pub fn validate(&self) -> RecommendationResult<()> {
        if self.token.is_empty() {
            return Err(RecommendationError::InvalidInput(
                "a Spotify access token is required".to_string(),
            ));
        }
        if self.spotify_user_id.trim().is_empty() {
            return Err(RecommendationError::InvalidInput(
                "a Spotify user id is required".to_string(),
            ));
        }
        Ok(())
    }
}
