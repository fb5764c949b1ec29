//! User REST route handlers
//!
//! - `POST /users` - Create or update a user by Spotify id
//! - `GET /users/:spotify_id` - Fetch a user
//! - `GET /users/:spotify_id/prompts` - Prompts submitted by a user

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::StoreState;
use crate::error::{ApiError, ApiResult};
use crate::models::{SaveUserOutcome, UpsertUser};

/// Create user router
pub fn users_router(state: StoreState) -> Router {
    Router::new()
        .route("/", post(save_user))
        .route("/:spotify_id", get(get_user))
        .route("/:spotify_id/prompts", get(list_prompts))
        .with_state(state)
}

/// Create or update a user
///
/// # Response
/// - 201 Created: new user
/// - 200 OK: existing user updated
/// - 400 Bad Request: missing `spotifyId`
async fn save_user(
    State(state): State<StoreState>,
    payload: Result<Json<UpsertUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(mut input) = payload?;
    input.spotify_id = input.spotify_id.trim().to_string();
    if input.spotify_id.is_empty() {
        return Err(ApiError::MissingField("spotifyId"));
    }

    let (user, outcome) = state.store.save_user(input).await?;
    let status = match outcome {
        SaveUserOutcome::Created => StatusCode::CREATED,
        SaveUserOutcome::Updated => StatusCode::OK,
    };
    tracing::debug!(user_id = %user.id, ?outcome, "Saved user");
    Ok((status, Json(user)))
}

async fn get_user(
    State(state): State<StoreState>,
    Path(spotify_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .store
        .find_user_by_spotify_id(&spotify_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", spotify_id))?;
    Ok(Json(user))
}

/// Prompts of a user, newest first
async fn list_prompts(
    State(state): State<StoreState>,
    Path(spotify_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .store
        .find_user_by_spotify_id(&spotify_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", spotify_id))?;
    let prompts = state.store.find_prompts_by_user(user.id).await?;
    Ok(Json(prompts))
}
