//! Playlist models
//!
//! A playlist row mirrors a playlist that already exists in the user's
//! Spotify account. It is written only after Spotify confirmed creation,
//! and its tracks always carry Spotify track ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Playlist record from the playlists table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: Uuid,

    /// User who owns this playlist
    pub user_id: Uuid,

    /// Prompt this playlist was generated from (one playlist per prompt)
    pub prompt_id: Uuid,

    /// Playlist id in Spotify's namespace
    pub spotify_playlist_id: String,

    /// Display name, as created in Spotify
    pub playlist_name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for recording a playlist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub user_id: Uuid,
    pub prompt_id: Uuid,
    pub spotify_playlist_id: String,
    pub playlist_name: String,
}

/// Track recorded in a playlist
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub playlist_id: Uuid,
    pub spotify_track_id: String,
    pub track_name: String,
    pub artist_name: String,
    /// Position in the generated order
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

/// Input for recording a track in a playlist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylistTrack {
    pub spotify_track_id: String,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub position: i32,
}

/// Result of recording a track; adding the same track twice is not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTrackOutcome {
    Added,
    AlreadyPresent,
}
