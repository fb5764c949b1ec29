//! Prompt models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A mood/theme a user asked a playlist for
///
/// Prompts are written before generation starts and never change
/// afterwards, so a failed run still leaves its prompt behind.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The free-text mood or theme
    pub mood: String,
    /// Optional extra guidance from the user
    pub additional_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a prompt
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrompt {
    pub user_id: Uuid,
    pub mood: String,
    pub additional_notes: Option<String>,
}
