//! Spotify Web API client for Vibelist
//!
//! This crate provides a typed client for the parts of the Spotify Web API
//! Vibelist uses:
//! - Listening profile (top tracks and top artists)
//! - Catalog search and track lookup
//! - Playlist creation and population
//! - The user's saved library
//!
//! Every call takes an explicit [`AccessToken`] belonging to the caller's
//! session. The client holds no token state and can be shared freely.
//!
//! # Example
//!
//! ```rust,no_run
//! use vibelist_shared_config::SpotifyConfig;
//! use vibelist_spotify_client::{AccessToken, SpotifyClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpotifyClient::new(&SpotifyConfig::default())?;
//! let token = AccessToken::new("BQD...");
//!
//! let artists = client.get_top_artists(&token, 20).await?;
//! for artist in artists {
//!     println!("{} ({:?})", artist.name, artist.genres);
//! }
//!
//! let hits = client
//!     .search_tracks(&token, r#"track:"Greedy" artist:"Tate McRae""#)
//!     .await?;
//! if let Some(track) = hits.first() {
//!     println!("{}", client.get_track_uri(&token, &track.id).await?);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::{AccessToken, SpotifyClient, MAX_URIS_PER_REQUEST};
pub use error::{SpotifyError, SpotifyResult};
pub use models::{
    CatalogArtist, CatalogTrack, CreatedPlaylist, SavedTrack, SavedTracksPage, SpotifyUser,
    TopArtist, TopTrack,
};
