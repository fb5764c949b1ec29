//! Shared test utilities for the Vibelist workspace
//!
//! This crate provides mock implementations of the external services the
//! recommendation pipeline talks to, so tests run without network access.
//!
//! # Mock Services
//!
//! - [`MockSpotifyServer`] - Mock Spotify Web API (profile, search, playlists)
//! - [`MockGeminiServer`] - Mock Gemini streaming generation endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use vibelist_test_utils::{MockGeminiServer, MockSpotifyServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let spotify = MockSpotifyServer::start().await;
//!     spotify.mock_top_tracks(&[("Greedy", "Tate McRae")]).await;
//!
//!     let gemini = MockGeminiServer::start().await;
//!     gemini.mock_stream_text(r#"[{"track":"Greedy","artist":"Tate McRae"}]"#).await;
//!
//!     // Point the clients at spotify.url() and gemini.url()
//! }
//! ```

mod gemini;
mod spotify;

pub use gemini::MockGeminiServer;
pub use spotify::MockSpotifyServer;
