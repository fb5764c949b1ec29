//! User models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Spotify account id, unique per user
    pub spotify_id: String,

    /// Email address reported by Spotify
    pub email: Option<String>,

    /// Display name reported by Spotify
    pub display_name: Option<String>,

    /// Profile image URL
    pub profile_image: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a user by Spotify id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub spotify_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
}

/// Whether a save created a new user or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveUserOutcome {
    Created,
    Updated,
}
