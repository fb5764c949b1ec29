//! Request extractors for the Vibelist API
//!
//! - `SpotifySession`: the caller's Spotify access token, 401 if missing

pub mod session;

pub use session::SpotifySession;
