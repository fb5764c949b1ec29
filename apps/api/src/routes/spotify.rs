//! Spotify proxy route handlers
//!
//! - `GET /spotify/saved-tracks?limit&offset` - The caller's saved tracks

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::RecommendationState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::SpotifySession;

const DEFAULT_SAVED_TRACKS_LIMIT: u32 = 20;
const MAX_SAVED_TRACKS_LIMIT: u32 = 50;

pub fn spotify_router(state: RecommendationState) -> Router {
    Router::new()
        .route("/saved-tracks", get(saved_tracks))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SavedTracksQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

async fn saved_tracks(
    State(state): State<RecommendationState>,
    session: SpotifySession,
    query: Result<Query<SavedTracksQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQueryParam {
        name: "limit/offset",
        reason: e.body_text(),
    })?;

    let limit = query.limit.unwrap_or(DEFAULT_SAVED_TRACKS_LIMIT);
    if !(1..=MAX_SAVED_TRACKS_LIMIT).contains(&limit) {
        return Err(ApiError::InvalidQueryParam {
            name: "limit",
            reason: format!("must be between 1 and {}", MAX_SAVED_TRACKS_LIMIT),
        });
    }

    let page = state
        .spotify
        .get_saved_tracks(&session.token, limit, query.offset.unwrap_or(0))
        .await?;
    Ok(Json(page))
}
