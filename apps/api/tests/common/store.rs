//! In-memory `RecommendationStore` for pipeline and route tests
//!
//! Mirrors the foreign key and uniqueness rules of the PostgreSQL schema so
//! the HTTP mapping of store errors can be exercised without a database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use vibelist_api::models::{
    AddTrackOutcome, NewPlaylist, NewPlaylistTrack, NewPrompt, Playlist, PlaylistTrack, Prompt,
    SaveUserOutcome, UpsertUser, User,
};
use vibelist_api::repositories::{RecommendationStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    prompts: Vec<Prompt>,
    playlists: Vec<Playlist>,
    tracks: Vec<PlaylistTrack>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_playlist_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save_playlist` fail
    pub fn fail_playlist_writes(&self) {
        self.fail_playlist_writes.store(true, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.tables.lock().unwrap().prompts.clone()
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        self.tables.lock().unwrap().playlists.clone()
    }

    pub fn tracks(&self) -> Vec<PlaylistTrack> {
        self.tables.lock().unwrap().tracks.clone()
    }
}

#[async_trait]
impl RecommendationStore for InMemoryStore {
    async fn save_user(&self, input: UpsertUser) -> StoreResult<(User, SaveUserOutcome)> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.spotify_id == input.spotify_id)
        {
            user.email = input.email;
            user.display_name = input.display_name;
            user.profile_image = input.profile_image;
            return Ok((user.clone(), SaveUserOutcome::Updated));
        }

        let user = User {
            id: Uuid::new_v4(),
            spotify_id: input.spotify_id,
            email: input.email,
            display_name: input.display_name,
            profile_image: input.profile_image,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok((user, SaveUserOutcome::Created))
    }

    async fn find_user_by_spotify_id(&self, spotify_id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.spotify_id == spotify_id)
            .cloned())
    }

    async fn save_prompt(&self, input: NewPrompt) -> StoreResult<Prompt> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(StoreError::MissingReference("user"));
        }
        let prompt = Prompt {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            mood: input.mood,
            additional_notes: input.additional_notes,
            created_at: Utc::now(),
        };
        tables.prompts.push(prompt.clone());
        Ok(prompt)
    }

    async fn find_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Prompt>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.prompts.iter().find(|p| p.id == prompt_id).cloned())
    }

    async fn find_prompts_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Prompt>> {
        let tables = self.tables.lock().unwrap();
        let mut prompts: Vec<Prompt> = tables
            .prompts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        prompts.reverse();
        Ok(prompts)
    }

    async fn save_playlist(&self, input: NewPlaylist) -> StoreResult<Playlist> {
        if self.fail_playlist_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("playlist writes disabled".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(StoreError::MissingReference("user"));
        }
        if !tables.prompts.iter().any(|p| p.id == input.prompt_id) {
            return Err(StoreError::MissingReference("prompt"));
        }
        if tables.playlists.iter().any(|p| {
            p.prompt_id == input.prompt_id || p.spotify_playlist_id == input.spotify_playlist_id
        }) {
            return Err(StoreError::Conflict("playlist already recorded".to_string()));
        }

        let playlist = Playlist {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            prompt_id: input.prompt_id,
            spotify_playlist_id: input.spotify_playlist_id,
            playlist_name: input.playlist_name,
            created_at: Utc::now(),
        };
        tables.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn find_playlist(&self, playlist_id: Uuid) -> StoreResult<Option<Playlist>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.playlists.iter().find(|p| p.id == playlist_id).cloned())
    }

    async fn find_playlist_by_prompt(&self, prompt_id: Uuid) -> StoreResult<Option<Playlist>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.prompt_id == prompt_id)
            .cloned())
    }

    async fn playlist_tracks(&self, playlist_id: Uuid) -> StoreResult<Vec<PlaylistTrack>> {
        let tables = self.tables.lock().unwrap();
        let mut tracks: Vec<PlaylistTrack> = tables
            .tracks
            .iter()
            .filter(|t| t.playlist_id == playlist_id)
            .cloned()
            .collect();
        tracks.sort_by_key(|t| t.position);
        Ok(tracks)
    }

    async fn add_track_to_playlist(
        &self,
        playlist_id: Uuid,
        track: NewPlaylistTrack,
    ) -> StoreResult<AddTrackOutcome> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.playlists.iter().any(|p| p.id == playlist_id) {
            return Err(StoreError::MissingReference("playlist"));
        }
        if tables
            .tracks
            .iter()
            .any(|t| t.playlist_id == playlist_id && t.spotify_track_id == track.spotify_track_id)
        {
            return Ok(AddTrackOutcome::AlreadyPresent);
        }
        tables.tracks.push(PlaylistTrack {
            playlist_id,
            spotify_track_id: track.spotify_track_id,
            track_name: track.track_name,
            artist_name: track.artist_name,
            position: track.position,
            added_at: Utc::now(),
        });
        Ok(AddTrackOutcome::Added)
    }
}
