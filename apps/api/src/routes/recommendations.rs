//! Recommendation REST route handlers
//!
//! - `POST /recommendations` - Generate a playlist from a mood prompt
//! - `POST /recommendations/description` - Describe a playlist for a mood
//!
//! Both read the caller's Spotify token from `Authorization: Bearer`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::RecommendationState;
use crate::error::ApiResult;
use crate::middleware::SpotifySession;
use crate::recommendations::SessionContext;

/// Create recommendation router
pub fn recommendations_router(state: RecommendationState) -> Router {
    Router::new()
        .route("/", post(generate_recommendations))
        .route("/description", post(describe_playlist))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub prompt: String,
    /// Defaults to the owner of the access token
    #[serde(default)]
    pub spotify_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub mood: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionResponse {
    pub playlist_description: String,
}

/// Run the recommendation pipeline
///
/// # Response
/// - 201 Created: playlist generated, with `notFound` listing dropped tracks
/// - 400 `INVALID_INPUT`, 401 missing token, 404 `USER_NOT_FOUND`
/// - 422 `MALFORMED_RECOMMENDATION` / `NO_RESOLVABLE_TRACKS`
/// - 502 upstream failures, including `TRACK_ADDITION_FAILED` with the
///   playlist ids in `details`
async fn generate_recommendations(
    State(state): State<RecommendationState>,
    session: SpotifySession,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;

    let spotify_id = match request
        .spotify_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    {
        Some(id) => id,
        None => state.spotify.get_current_user_id(&session.token).await?,
    };

    let ctx = SessionContext::new(session.token, spotify_id);
    let result = state
        .pipeline
        .generate_recommendations(&request.prompt, request.notes.as_deref(), &ctx)
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}

async fn describe_playlist(
    State(state): State<RecommendationState>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let description = state
        .pipeline
        .generator()
        .describe_playlist(&request.mood)
        .await?;

    Ok(Json(DescriptionResponse {
        playlist_description: description,
    }))
}
