//! Recommendation pipeline errors
//!
//! Every stage of the pipeline fails with one of these kinds. Per-track
//! resolution misses are not errors; they are collected into `notFound`.

use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use super::CandidateTrack;
use crate::repositories::StoreError;

/// Terminal failure of a recommendation run
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// Missing prompt, identity or token
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user not found: {spotify_id}")]
    UserNotFound { spotify_id: String },

    /// The listening profile could not be fetched
    #[error("catalog service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The text generation call failed
    #[error("generator error: {0}")]
    GeneratorError(String),

    /// Generator output could not be turned into candidates
    #[error("malformed recommendation: {reason}")]
    MalformedRecommendation { reason: String, raw: String },

    /// No candidate resolved to a catalog track
    #[error("none of the {} recommended tracks could be found in the catalog", not_found.len())]
    NoResolvableTracks { not_found: Vec<CandidateTrack> },

    #[error("playlist creation failed: {0}")]
    PlaylistCreationFailed(String),

    /// The remote playlist exists but could not be populated or recorded
    #[error("adding tracks to playlist {spotify_playlist_id} failed: {reason}")]
    TrackAdditionFailed {
        playlist_id: Option<Uuid>,
        spotify_playlist_id: String,
        reason: String,
    },

    /// Local store failure before any remote side effect
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RecommendationError {
    /// Machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::GeneratorError(_) => "GENERATOR_ERROR",
            Self::MalformedRecommendation { .. } => "MALFORMED_RECOMMENDATION",
            Self::NoResolvableTracks { .. } => "NO_RESOLVABLE_TRACKS",
            Self::PlaylistCreationFailed(_) => "PLAYLIST_CREATION_FAILED",
            Self::TrackAdditionFailed { .. } => "TRACK_ADDITION_FAILED",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Diagnostic payload for the caller, when the kind carries one
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::MalformedRecommendation { raw, .. } => Some(json!({ "raw": raw })),
            Self::NoResolvableTracks { not_found } => Some(json!({ "notFound": not_found })),
            Self::TrackAdditionFailed {
                playlist_id,
                spotify_playlist_id,
                ..
            } => Some(json!({
                "playlistId": playlist_id,
                "spotifyPlaylistId": spotify_playlist_id,
            })),
            Self::UserNotFound { spotify_id } => Some(json!({ "spotifyId": spotify_id })),
            _ => None,
        }
    }
}

impl From<StoreError> for RecommendationError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Result type for pipeline operations
pub type RecommendationResult<T> = Result<T, RecommendationError>;
