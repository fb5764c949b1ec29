//! Spotify session extractor for Axum handlers
//!
//! The caller's Spotify access token arrives as `Authorization: Bearer` on
//! each request and is handed to the pipeline explicitly. Nothing stores it
//! between requests.
//!
//! ```rust,ignore
//! async fn handler(session: SpotifySession) -> impl IntoResponse {
//!     spotify.get_current_user_id(&session.token).await
//! }
//! ```

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use vibelist_spotify_client::AccessToken;

use crate::error::ApiError;

/// Spotify access token of the current request
#[derive(Debug, Clone)]
pub struct SpotifySession {
    pub token: AccessToken,
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SpotifySession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Request rejected: missing Spotify access token");
            ApiError::Unauthorized
        })?;

        Ok(SpotifySession {
            token: AccessToken::new(token),
        })
    }
}
