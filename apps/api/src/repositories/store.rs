//! Persistence seam used by the recommendation pipeline and the routes
//!
//! [`RecommendationStore`] is the narrow save/fetch surface the pipeline
//! depends on. [`PgRecommendationStore`] implements it over the sqlx
//! repositories; tests substitute an in-memory implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::{PlaylistRepository, PromptRepository, UserRepository};
use crate::models::{
    AddTrackOutcome, NewPlaylist, NewPlaylistTrack, NewPrompt, Playlist, PlaylistTrack, Prompt,
    SaveUserOutcome, UpsertUser, User,
};

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A foreign key pointed at a missing row
    #[error("Referenced {0} does not exist")]
    MissingReference(&'static str),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                let referenced = match db.constraint() {
                    Some(c) if c.ends_with("_prompt_id_fkey") => "prompt",
                    Some(c) if c.ends_with("_playlist_id_fkey") => "playlist",
                    _ => "user",
                };
                StoreError::MissingReference(referenced)
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Save/fetch operations over users, prompts and playlists
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Create a user, or refresh the existing one with the same Spotify id
    async fn save_user(&self, input: UpsertUser) -> StoreResult<(User, SaveUserOutcome)>;

    async fn find_user_by_spotify_id(&self, spotify_id: &str) -> StoreResult<Option<User>>;

    async fn save_prompt(&self, input: NewPrompt) -> StoreResult<Prompt>;

    async fn find_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Prompt>>;

    /// Prompts of a user, newest first
    async fn find_prompts_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Prompt>>;

    async fn save_playlist(&self, input: NewPlaylist) -> StoreResult<Playlist>;

    async fn find_playlist(&self, playlist_id: Uuid) -> StoreResult<Option<Playlist>>;

    async fn find_playlist_by_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Playlist>>;

    /// Tracks of a playlist in recorded order
    async fn playlist_tracks(&self, playlist_id: Uuid) -> StoreResult<Vec<PlaylistTrack>>;

    /// Record a track in a playlist; a repeated add is a no-op
    async fn add_track_to_playlist(
        &self,
        playlist_id: Uuid,
        track: NewPlaylistTrack,
    ) -> StoreResult<AddTrackOutcome>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgRecommendationStore {
    users: UserRepository,
    prompts: PromptRepository,
    playlists: PlaylistRepository,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            prompts: PromptRepository::new(pool.clone()),
            playlists: PlaylistRepository::new(pool),
        }
    }

    /// Connection pool shared by the repositories
    pub fn pool(&self) -> &PgPool {
        self.users.pool()
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn save_user(&self, input: UpsertUser) -> StoreResult<(User, SaveUserOutcome)> {
        Ok(self.users.upsert(&input).await?)
    }

    async fn find_user_by_spotify_id(&self, spotify_id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_by_spotify_id(spotify_id).await?)
    }

    async fn save_prompt(&self, input: NewPrompt) -> StoreResult<Prompt> {
        Ok(self.prompts.create(&input).await?)
    }

    async fn find_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Prompt>> {
        Ok(self.prompts.find_by_id(prompt_id).await?)
    }

    async fn find_prompts_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Prompt>> {
        Ok(self.prompts.find_by_user(user_id).await?)
    }

    async fn save_playlist(&self, input: NewPlaylist) -> StoreResult<Playlist> {
        Ok(self.playlists.create(&input).await?)
    }

    async fn find_playlist(&self, playlist_id: Uuid) -> StoreResult<Option<Playlist>> {
        Ok(self.playlists.find_by_id(playlist_id).await?)
    }

    async fn find_playlist_by_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Playlist>> {
        Ok(self.playlists.find_by_prompt(prompt_id).await?)
    }

    async fn playlist_tracks(&self, playlist_id: Uuid) -> StoreResult<Vec<PlaylistTrack>> {
        Ok(self.playlists.get_tracks(playlist_id).await?)
    }

    async fn add_track_to_playlist(
        &self,
        playlist_id: Uuid,
        track: NewPlaylistTrack,
    ) -> StoreResult<AddTrackOutcome> {
        Ok(self.playlists.add_track(playlist_id, &track).await?)
    }
}
