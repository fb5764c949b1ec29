//! Profile Fetcher
//!
//! Reads the user's top tracks and top artists from Spotify and reduces them
//! to the compact shape handed to the generator.

use serde::Serialize;
use tracing::{debug, instrument, warn};
use vibelist_spotify_client::{SpotifyClient, TopArtist, TopTrack};

use super::{RecommendationError, RecommendationResult, SessionContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTrack {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileArtist {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
}

/// Listening profile snapshot, used only as generator input
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfile {
    pub top_tracks: Vec<ProfileTrack>,
    pub top_artists: Vec<ProfileArtist>,
}

impl From<TopTrack> for ProfileTrack {
    fn from(track: TopTrack) -> Self {
        Self {
            title: track.title,
            artist: track.artist,
        }
    }
}

impl From<TopArtist> for ProfileArtist {
    fn from(artist: TopArtist) -> Self {
        Self {
            name: artist.name,
            genres: artist.genres,
            popularity: artist.popularity,
        }
    }
}

/// Fetches the listening profile for a session
#[derive(Clone)]
pub struct ProfileFetcher {
    spotify: SpotifyClient,
    limit: u32,
}

impl ProfileFetcher {
    /// The number of items per collection comes from the client config
    pub fn new(spotify: SpotifyClient) -> Self {
        let limit = spotify.config().top_items_limit;
        Self { spotify, limit }
    }

    /// Fetch top tracks and top artists
    ///
    /// Either fetch failing fails the whole profile; nothing is retried.
    #[instrument(skip_all, fields(limit = self.limit))]
    pub async fn fetch(&self, ctx: &SessionContext) -> RecommendationResult<UserProfile> {
        let (tracks, artists) = tokio::try_join!(
            self.spotify.get_top_tracks(&ctx.token, self.limit),
            self.spotify.get_top_artists(&ctx.token, self.limit),
        )
        .map_err(|e| {
            warn!(error = %e, status = ?e.status(), "Profile fetch failed");
            RecommendationError::UpstreamUnavailable(e.to_string())
        })?;

        let profile = UserProfile {
            top_tracks: tracks.into_iter().map(Into::into).collect(),
            top_artists: artists.into_iter().map(Into::into).collect(),
        };
        debug!(
            tracks = profile.top_tracks.len(),
            artists = profile.top_artists.len(),
            "Fetched listening profile"
        );
        Ok(profile)
    }
}
