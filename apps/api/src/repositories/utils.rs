//! Shared column lists for repositories
//!
//! Keeping the SELECT lists in one place keeps every query that maps onto
//! the same model in agreement with its `FromRow` derive.

/// SQL columns for user queries
pub const USER_COLUMNS: &str = r#"
    id, spotify_id, email, display_name, profile_image, created_at
"#;

/// SQL columns for prompt queries
pub const PROMPT_COLUMNS: &str = r#"
    id, user_id, mood, additional_notes, created_at
"#;

/// SQL columns for playlist queries
pub const PLAYLIST_COLUMNS: &str = r#"
    id, user_id, prompt_id, spotify_playlist_id, playlist_name, created_at
"#;

/// SQL columns for playlist track queries
pub const PLAYLIST_TRACK_COLUMNS: &str = r#"
    playlist_id, spotify_track_id, track_name, artist_name, position, added_at
"#;
