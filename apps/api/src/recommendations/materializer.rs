//! Playlist Materializer
//!
//! Creates the playlist in the user's Spotify account and fills it with the
//! resolved tracks.

use tracing::{info, instrument, warn};
use uuid::Uuid;
use vibelist_spotify_client::{CreatedPlaylist, SpotifyClient, MAX_URIS_PER_REQUEST};

use super::{RecommendationError, RecommendationResult, SessionContext};

/// Longest name the `playlists.playlist_name` column holds, in characters
pub const MAX_PLAYLIST_NAME_LENGTH: usize = 255;

pub(crate) const PLAYLIST_NAME_SUFFIX: &str = " Vibes";

/// Display name derived from the prompt
pub fn playlist_name(prompt: &str) -> String {
    format!("{}{}", prompt.trim(), PLAYLIST_NAME_SUFFIX)
}

pub fn playlist_description(prompt: &str) -> String {
    format!("Generated by Vibelist from the prompt: {}", prompt.trim())
}

#[derive(Clone)]
pub struct PlaylistMaterializer {
    spotify: SpotifyClient,
    public: bool,
}

impl PlaylistMaterializer {
    pub fn new(spotify: SpotifyClient) -> Self {
        let public = spotify.config().playlist_public;
        Self { spotify, public }
    }

    /// Create an empty playlist under the session's account
    #[instrument(skip(self, ctx, description))]
    pub async fn create(
        &self,
        ctx: &SessionContext,
        name: &str,
        description: &str,
    ) -> RecommendationResult<CreatedPlaylist> {
        let created = self
            .spotify
            .create_playlist(&ctx.token, &ctx.spotify_user_id, name, description, self.public)
            .await
            .map_err(|e| {
                warn!(error = %e, "Playlist creation failed");
                RecommendationError::PlaylistCreationFailed(e.to_string())
            })?;

        info!(spotify_playlist_id = %created.id, "Created Spotify playlist");
        Ok(created)
    }

    /// Add the URIs to an existing playlist
    ///
    /// Spotify accepts at most [`MAX_URIS_PER_REQUEST`] URIs per call, so a
    /// longer list goes out in consecutive batches. The first failing batch
    /// stops the add; earlier batches stay in the playlist.
    #[instrument(skip(self, ctx, uris), fields(uri_count = uris.len()))]
    pub async fn add_tracks(
        &self,
        ctx: &SessionContext,
        spotify_playlist_id: &str,
        playlist_id: Option<Uuid>,
        uris: &[String],
    ) -> RecommendationResult<()> {
        for batch in uris.chunks(MAX_URIS_PER_REQUEST) {
            self.spotify
                .add_tracks_to_playlist(&ctx.token, spotify_playlist_id, batch)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Adding tracks failed");
                    RecommendationError::TrackAdditionFailed {
                        playlist_id,
                        spotify_playlist_id: spotify_playlist_id.to_string(),
                        reason: e.to_string(),
                    }
                })?;
        }
        Ok(())
    }
}
