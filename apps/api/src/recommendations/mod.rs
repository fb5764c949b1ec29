//! Recommendation pipeline
//!
//! Turns a mood prompt plus the user's Spotify listening profile into a
//! populated Spotify playlist:
//!
//! ```text
//! profile ─┐
//!          ├─▶ generator ─▶ parser ─▶ resolver ─▶ materializer ─▶ store
//! prompt ──┘
//! ```
//!
//! Each stage lives in its own module; [`RecommendationPipeline`] sequences
//! them and owns the failure contract.

pub mod context;
pub mod error;
pub mod generator;
pub mod materializer;
pub mod orchestrator;
pub mod parser;
pub mod profile;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use context::SessionContext;
pub use error::{RecommendationError, RecommendationResult};
pub use generator::RecommendationGenerator;
pub use materializer::PlaylistMaterializer;
pub use orchestrator::{GeneratedPlaylist, PipelineStage, RecommendationPipeline};
pub use parser::parse_recommendations;
pub use profile::{ProfileArtist, ProfileFetcher, ProfileTrack, UserProfile};
pub use resolver::{CatalogResolver, Resolution, ResolvedTrack};

/// A track/artist pair proposed by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTrack {
    pub track: String,
    pub artist: String,
}

impl CandidateTrack {
    pub fn new(track: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            track: track.into(),
            artist: artist.into(),
        }
    }
}
