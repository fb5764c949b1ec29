//! Database models for Vibelist
//!
//! This module contains SQLx models for:
//! - Users, keyed by their Spotify account id
//! - Prompts (the mood text a user submitted)
//! - Playlists generated from prompts, and their recorded tracks

pub mod playlist;
pub mod prompt;
pub mod user;

pub use playlist::{AddTrackOutcome, NewPlaylist, NewPlaylistTrack, Playlist, PlaylistTrack};
pub use prompt::{NewPrompt, Prompt};
pub use user::{SaveUserOutcome, UpsertUser, User};
