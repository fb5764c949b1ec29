//! Playlist REST route handlers
//!
//! - `POST /playlists` - Record a playlist created in Spotify
//! - `GET /playlists/:id` - Fetch a playlist with its tracks
//! - `POST /playlists/:id/tracks` - Record a track (idempotent)

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
use crate::models::{AddTrackOutcome, NewPlaylist, NewPlaylistTrack, Playlist, PlaylistTrack};
use crate::recommendations::materializer::MAX_PLAYLIST_NAME_LENGTH;

/// Playlist with its recorded tracks
#[derive(Debug, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub tracks: Vec<PlaylistTrack>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackResponse {
    pub playlist_id: Uuid,
    pub spotify_track_id: String,
    /// False when the track was already in the playlist
    pub added: bool,
}

/// Create playlist router
pub fn playlists_router(state: StoreState) -> Router {
    Router::new()
        .route("/", post(create_playlist))
        .route("/:id", get(get_playlist))
        .route("/:id/tracks", post(add_track))
        .with_state(state)
}

/// Record a playlist
///
/// # Response
/// - 201 Created
/// - 404 Not Found: unknown user or prompt
/// - 409 Conflict: the prompt already has a playlist
async fn create_playlist(
    State(state): State<StoreState>,
    payload: Result<Json<NewPlaylist>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    if input.spotify_playlist_id.trim().is_empty() {
        return Err(ApiError::MissingField("spotifyPlaylistId"));
    }
    if input.playlist_name.trim().is_empty() {
        return Err(ApiError::MissingField("playlistName"));
    }
    if input.playlist_name.chars().count() > MAX_PLAYLIST_NAME_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "playlistName must be at most {} characters",
            MAX_PLAYLIST_NAME_LENGTH
        )));
    }

    let playlist = state.store.save_playlist(input).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

async fn get_playlist(
    State(state): State<StoreState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .store
        .find_playlist(id)
        .await?
        .ok_or_else(|| ApiError::not_found("playlist", id.to_string()))?;
    let tracks = state.store.playlist_tracks(id).await?;
    Ok(Json(PlaylistDetail { playlist, tracks }))
}

/// Record a track in a playlist
///
/// # Response
/// - 201 Created: track added
/// - 200 OK: track was already present
/// - 404 Not Found: unknown playlist
async fn add_track(
    State(state): State<StoreState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<NewPlaylistTrack>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(track) = payload?;
    if track.spotify_track_id.trim().is_empty() {
        return Err(ApiError::MissingField("spotifyTrackId"));
    }

    state
        .store
        .find_playlist(id)
        .await?
        .ok_or_else(|| ApiError::not_found("playlist", id.to_string()))?;

    let spotify_track_id = track.spotify_track_id.clone();
    let outcome = state.store.add_track_to_playlist(id, track).await?;
    let (status, added) = match outcome {
        AddTrackOutcome::Added => (StatusCode::CREATED, true),
        AddTrackOutcome::AlreadyPresent => (StatusCode::OK, false),
    };

    Ok((
        status,
        Json(AddTrackResponse {
            playlist_id: id,
            spotify_track_id,
            added,
        }),
    ))
}
