//! Prompt REST route handlers
//!
//! - `POST /prompts` - Record a prompt for a user
//! - `GET /prompts/:id` - Fetch a prompt and the playlist generated from it

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::StoreState;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewPrompt, Playlist, Prompt};

/// Prompt with its playlist, when one was generated
#[derive(Debug, Serialize)]
pub struct PromptDetail {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub playlist: Option<Playlist>,
}

/// Create prompt router
pub fn prompts_router(state: StoreState) -> Router {
    Router::new()
        .route("/", post(create_prompt))
        .route("/:id", get(get_prompt))
        .with_state(state)
}

/// Record a prompt
///
/// # Response
/// - 201 Created
/// - 400 Bad Request: empty mood
/// - 404 Not Found: unknown user
async fn create_prompt(
    State(state): State<StoreState>,
    payload: Result<Json<NewPrompt>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(mut input) = payload?;
    input.mood = input.mood.trim().to_string();
    if input.mood.is_empty() {
        return Err(ApiError::MissingField("mood"));
    }

    let prompt = state.store.save_prompt(input).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

async fn get_prompt(
    State(state): State<StoreState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let prompt = state
        .store
        .find_prompt(id)
        .await?
        .ok_or_else(|| ApiError::not_found("prompt", id.to_string()))?;
    let playlist = state.store.find_playlist_by_prompt(id).await?;
    Ok(Json(PromptDetail { prompt, playlist }))
}
