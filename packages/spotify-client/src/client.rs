//! Spotify Web API client implementation

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use vibelist_shared_config::SpotifyConfig;

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{
    AddTracksRequest, ArtistSearchResponse, CatalogArtist, CatalogTrack, CreatePlaylistRequest,
    CreatedPlaylist, ErrorResponse, Paging, RawArtist, RawPlaylist, RawSavedTrack, RawTrack,
    RawUser, SavedTrack, SavedTracksPage, SnapshotResponse, SpotifyUser, TopArtist, TopTrack,
    TrackSearchResponse, TrackUriResponse,
};

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Spotify caps paged endpoints at 50 items per request
const MAX_PAGE_LIMIT: u32 = 50;

/// Spotify accepts at most 100 URIs per add-items request
pub const MAX_URIS_PER_REQUEST: usize = 100;

/// Default number of search results requested
const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Maximum search query length accepted by Spotify
const MAX_QUERY_LENGTH: usize = 250;

/// OAuth access token for one user session
///
/// Tokens are passed explicitly to every call; the client itself never
/// holds one.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Spotify Web API client
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    /// Create a new Spotify client from configuration
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Vibelist/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Truncate error body to prevent memory exhaustion
    /// Safely handles UTF-8 boundaries to avoid panics on multi-byte characters
    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }

        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);

        format!("{}... (truncated)", &body[..truncate_at])
    }

    fn validate_token(token: &AccessToken) -> SpotifyResult<()> {
        if token.is_empty() {
            return Err(SpotifyError::Unauthorized(
                "access token is empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_limit(limit: u32) -> SpotifyResult<u32> {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(SpotifyError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(limit)
    }

    fn validate_query(query: &str) -> SpotifyResult<&str> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_QUERY_LENGTH {
            return Err(SpotifyError::InvalidInput(format!(
                "search query too long (max {} characters)",
                MAX_QUERY_LENGTH
            )));
        }
        Ok(trimmed)
    }

    fn validate_id<'a>(what: &str, id: &'a str) -> SpotifyResult<&'a str> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SpotifyError::InvalidInput(format!("{} cannot be empty", what)));
        }
        Ok(trimmed)
    }

    /// Send an authorized request and map non-success statuses to errors
    async fn send(
        &self,
        token: &AccessToken,
        request: RequestBuilder,
        resource: &str,
    ) -> SpotifyResult<Response> {
        Self::validate_token(token)?;

        let response = request
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpotifyError::Timeout
                } else {
                    SpotifyError::Http(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = Self::truncate_error_body(response.text().await.unwrap_or_default());
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::UNAUTHORIZED => SpotifyError::Unauthorized(message),
            StatusCode::NOT_FOUND => SpotifyError::NotFound(resource.to_string()),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(retry_after = ?retry_after, "Spotify API rate limited");
                SpotifyError::RateLimited { retry_after }
            }
            _ => SpotifyError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// GET a JSON resource
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, String)],
    ) -> SpotifyResult<T> {
        let request = self.http_client.get(self.config.api_url(path)).query(query);
        let response = self.send(token, request, path).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Get the user's top tracks, normalized to title/artist/popularity
    #[instrument(skip(self, token))]
    pub async fn get_top_tracks(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> SpotifyResult<Vec<TopTrack>> {
        let limit = Self::validate_limit(limit)?;
        let page: Paging<RawTrack> = self
            .get_json(token, "/me/top/tracks", &[("limit", limit.to_string())])
            .await?;

        let tracks: Vec<TopTrack> = page.items.into_iter().map(Into::into).collect();
        debug!(count = tracks.len(), "Fetched top tracks");
        Ok(tracks)
    }

    /// Get the user's top artists with genres and popularity
    #[instrument(skip(self, token))]
    pub async fn get_top_artists(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> SpotifyResult<Vec<TopArtist>> {
        let limit = Self::validate_limit(limit)?;
        let page: Paging<RawArtist> = self
            .get_json(token, "/me/top/artists", &[("limit", limit.to_string())])
            .await?;

        let artists: Vec<TopArtist> = page.items.into_iter().map(Into::into).collect();
        debug!(count = artists.len(), "Fetched top artists");
        Ok(artists)
    }

    /// Search the catalog for tracks
    ///
    /// The query is sent as-is, so Spotify field filters such as
    /// `track:"..." artist:"..."` are honoured. URL escaping is handled here.
    #[instrument(skip(self, token))]
    pub async fn search_tracks(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> SpotifyResult<Vec<CatalogTrack>> {
        let query = Self::validate_query(query)?;
        let response: TrackSearchResponse = self
            .get_json(
                token,
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", DEFAULT_SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;

        let tracks: Vec<CatalogTrack> = response
            .tracks
            .items
            .into_iter()
            .filter(|t| t.id.is_some())
            .map(Into::into)
            .collect();
        debug!(result_count = tracks.len(), "Track search finished");
        Ok(tracks)
    }

    /// Search the catalog for artists
    #[instrument(skip(self, token))]
    pub async fn search_artists(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> SpotifyResult<Vec<CatalogArtist>> {
        let query = Self::validate_query(query)?;
        let response: ArtistSearchResponse = self
            .get_json(
                token,
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "artist".to_string()),
                    ("limit", DEFAULT_SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;

        let artists: Vec<CatalogArtist> = response
            .artists
            .items
            .into_iter()
            .map(Into::into)
            .collect();
        debug!(result_count = artists.len(), "Artist search finished");
        Ok(artists)
    }

    /// Look up a track by id and return its playable URI
    #[instrument(skip(self, token))]
    pub async fn get_track_uri(&self, token: &AccessToken, track_id: &str) -> SpotifyResult<String> {
        let track_id = Self::validate_id("track id", track_id)?;
        let path = format!("/tracks/{}", track_id);
        let response: TrackUriResponse = self.get_json(token, &path, &[]).await?;

        response
            .uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| SpotifyError::NotFound(format!("uri for track {}", track_id)))
    }

    /// Get the profile of the token's owner
    #[instrument(skip(self, token))]
    pub async fn get_current_user(&self, token: &AccessToken) -> SpotifyResult<SpotifyUser> {
        let raw: RawUser = self.get_json(token, "/me", &[]).await?;
        Ok(raw.into())
    }

    /// Get the Spotify account id of the token's owner
    pub async fn get_current_user_id(&self, token: &AccessToken) -> SpotifyResult<String> {
        Ok(self.get_current_user(token).await?.id)
    }

    /// Create an empty playlist under the given account
    #[instrument(skip(self, token, description))]
    pub async fn create_playlist(
        &self,
        token: &AccessToken,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> SpotifyResult<CreatedPlaylist> {
        let user_id = Self::validate_id("user id", user_id)?;
        if name.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "playlist name cannot be empty".to_string(),
            ));
        }

        let path = format!("/users/{}/playlists", user_id);
        let request = self
            .http_client
            .post(self.config.api_url(&path))
            .json(&CreatePlaylistRequest {
                name,
                description,
                public,
            });
        let response = self.send(token, request, &path).await?;
        let raw: RawPlaylist = serde_json::from_str(&response.text().await?)?;

        debug!(playlist_id = %raw.id, "Created playlist");
        Ok(raw.into())
    }

    /// Add tracks to a playlist in one request, returning the snapshot id
    #[instrument(skip(self, token, uris), fields(uri_count = uris.len()))]
    pub async fn add_tracks_to_playlist(
        &self,
        token: &AccessToken,
        playlist_id: &str,
        uris: &[String],
    ) -> SpotifyResult<Option<String>> {
        let playlist_id = Self::validate_id("playlist id", playlist_id)?;
        if uris.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "at least one track uri is required".to_string(),
            ));
        }
        if uris.len() > MAX_URIS_PER_REQUEST {
            return Err(SpotifyError::InvalidInput(format!(
                "at most {} track uris can be added per request",
                MAX_URIS_PER_REQUEST
            )));
        }

        let path = format!("/playlists/{}/tracks", playlist_id);
        let request = self
            .http_client
            .post(self.config.api_url(&path))
            .json(&AddTracksRequest { uris });
        let response = self.send(token, request, &path).await?;
        let text = response.text().await?;

        // Snapshot id is informational; an unexpected body is not a failure
        let snapshot = serde_json::from_str::<SnapshotResponse>(&text)
            .ok()
            .and_then(|s| s.snapshot_id);
        debug!(snapshot = ?snapshot, "Added tracks to playlist");
        Ok(snapshot)
    }

    /// Get one page of the user's saved tracks
    #[instrument(skip(self, token))]
    pub async fn get_saved_tracks(
        &self,
        token: &AccessToken,
        limit: u32,
        offset: u32,
    ) -> SpotifyResult<SavedTracksPage> {
        let limit = Self::validate_limit(limit)?;
        let page: Paging<RawSavedTrack> = self
            .get_json(
                token,
                "/me/tracks",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;

        let items: Vec<SavedTrack> = page
            .items
            .into_iter()
            .filter_map(|item| {
                let track = item.track.filter(|t| t.id.is_some())?;
                Some(SavedTrack {
                    added_at: item.added_at,
                    track: track.into(),
                })
            })
            .collect();

        Ok(SavedTracksPage {
            items,
            total: page.total,
            limit: if page.limit == 0 { limit } else { page.limit },
            offset: page.offset,
            has_more: page.next.is_some(),
        })
    }
}
