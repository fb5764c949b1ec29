//! Vibelist API library
//!
//! Exposes the service components for the binary and for integration
//! tests. [`api_router`] wires every route except the health checks, which
//! need a live database pool.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod recommendations;
pub mod repositories;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use vibelist_gemini_client::GeminiClient;
use vibelist_spotify_client::SpotifyClient;

pub use error::{ApiError, ApiResult, ErrorResponse};

use recommendations::RecommendationPipeline;
use repositories::RecommendationStore;
use routes::{
    playlists_router, prompts_router, recommendations_router, spotify_router, users_router,
    RecommendationState, StoreState,
};

/// Build the application routes over a store and the two upstream clients
pub fn api_router(
    store: Arc<dyn RecommendationStore>,
    spotify: SpotifyClient,
    gemini: GeminiClient,
) -> Router {
    let pipeline = RecommendationPipeline::new(store.clone(), spotify.clone(), gemini);
    let store_state = StoreState::new(store);
    let recommendation_state = RecommendationState::new(pipeline, spotify);

    Router::new()
        .route("/", get(root))
        .nest("/users", users_router(store_state.clone()))
        .nest("/prompts", prompts_router(store_state.clone()))
        .nest("/playlists", playlists_router(store_state))
        .nest(
            "/recommendations",
            recommendations_router(recommendation_state.clone()),
        )
        .nest("/spotify", spotify_router(recommendation_state))
}

async fn root() -> &'static str {
    "Vibelist - playlists from a mood"
}
