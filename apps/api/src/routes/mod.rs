//! HTTP route handlers for the Vibelist API
//!
//! - Health check and status endpoints
//! - User, prompt and playlist records
//! - The recommendation pipeline entry point
//! - Spotify library proxies

pub mod health;
pub mod playlists;
pub mod prompts;
pub mod recommendations;
pub mod spotify;
pub mod users;

use std::sync::Arc;

use vibelist_spotify_client::SpotifyClient;

use crate::recommendations::RecommendationPipeline;
use crate::repositories::RecommendationStore;

pub use health::{health_router, HealthState};
pub use playlists::playlists_router;
pub use prompts::prompts_router;
pub use recommendations::recommendations_router;
pub use spotify::spotify_router;
pub use users::users_router;

/// Shared state for the record handlers
#[derive(Clone)]
pub struct StoreState {
    pub store: Arc<dyn RecommendationStore>,
}

impl StoreState {
    pub fn new(store: Arc<dyn RecommendationStore>) -> Self {
        Self { store }
    }
}

/// Shared state for handlers that call Spotify or run the pipeline
#[derive(Clone)]
pub struct RecommendationState {
    pub pipeline: Arc<RecommendationPipeline>,
    pub spotify: SpotifyClient,
}

impl RecommendationState {
    pub fn new(pipeline: RecommendationPipeline, spotify: SpotifyClient) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            spotify,
        }
    }
}
