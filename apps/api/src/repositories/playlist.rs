//! Playlist repository
//!
//! Playlists and their tracks. Track rows are keyed by
//! `(playlist_id, spotify_track_id)`, so recording the same track twice
//! leaves a single row.

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{PLAYLIST_COLUMNS, PLAYLIST_TRACK_COLUMNS};
use crate::models::{AddTrackOutcome, NewPlaylist, NewPlaylistTrack, Playlist, PlaylistTrack};

/// Repository for playlist database operations
#[derive(Clone)]
pub struct PlaylistRepository {
    pool: PgPool,
}

impl PlaylistRepository {
    /// Create a new PlaylistRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a playlist and return the stored row
    pub async fn create(&self, input: &NewPlaylist) -> Result<Playlist, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO playlists (user_id, prompt_id, spotify_playlist_id, playlist_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PLAYLIST_COLUMNS
        );
        sqlx::query_as::<_, Playlist>(&sql)
            .bind(input.user_id)
            .bind(input.prompt_id)
            .bind(&input.spotify_playlist_id)
            .bind(&input.playlist_name)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a playlist by its unique ID
    pub async fn find_by_id(&self, playlist_id: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
        let sql = format!("SELECT {} FROM playlists WHERE id = $1", PLAYLIST_COLUMNS);
        sqlx::query_as::<_, Playlist>(&sql)
            .bind(playlist_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find the playlist generated from a prompt, if any
    pub async fn find_by_prompt(&self, prompt_id: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM playlists WHERE prompt_id = $1",
            PLAYLIST_COLUMNS
        );
        sqlx::query_as::<_, Playlist>(&sql)
            .bind(prompt_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Get all tracks in a playlist, ordered by position
    pub async fn get_tracks(&self, playlist_id: Uuid) -> Result<Vec<PlaylistTrack>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM playlist_tracks WHERE playlist_id = $1 ORDER BY position, added_at",
            PLAYLIST_TRACK_COLUMNS
        );
        sqlx::query_as::<_, PlaylistTrack>(&sql)
            .bind(playlist_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Record a track in a playlist
    ///
    /// Adding a track that is already present is a no-op.
    pub async fn add_track(
        &self,
        playlist_id: Uuid,
        track: &NewPlaylistTrack,
    ) -> Result<AddTrackOutcome, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO playlist_tracks (playlist_id, spotify_track_id, track_name, artist_name, position)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (playlist_id, spotify_track_id) DO NOTHING
            "#,
        )
        .bind(playlist_id)
        .bind(&track.spotify_track_id)
        .bind(&track.track_name)
        .bind(&track.artist_name)
        .bind(track.position)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(AddTrackOutcome::Added)
        } else {
            Ok(AddTrackOutcome::AlreadyPresent)
        }
    }
}
