//! Spotify Web API response models
//!
//! Public records are what the rest of Vibelist works with. The `Raw*`
//! types mirror Spotify's JSON and stay private to the crate.

use serde::{Deserialize, Serialize};

/// A track from the user's top tracks, normalized for prompting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTrack {
    pub id: String,
    pub title: String,
    /// Credited artists joined with ", "
    pub artist: String,
    pub popularity: u32,
}

/// An artist from the user's top artists, normalized for prompting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
}

/// A track returned by search, lookup, or the saved library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    /// Playable URI, e.g. `spotify:track:...`
    pub uri: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub popularity: Option<u32>,
}

impl CatalogTrack {
    /// First credited artist, if any
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

/// An artist returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

/// The owner of an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

/// A playlist freshly created under a user's account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub uri: Option<String>,
    pub external_url: Option<String>,
}

/// A track in the user's saved library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTrack {
    pub added_at: Option<String>,
    pub track: CatalogTrack,
}

/// One page of the user's saved library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTracksPage {
    pub items: Vec<SavedTrack>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbumRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<RawArtistRef>,
    pub album: Option<RawAlbumRef>,
    pub popularity: Option<u32>,
}

impl RawTrack {
    fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }
}

impl From<RawTrack> for TopTrack {
    fn from(raw: RawTrack) -> Self {
        let artist = raw.artist_names().join(", ");
        Self {
            id: raw.id.unwrap_or_default(),
            title: raw.name,
            artist,
            popularity: raw.popularity.unwrap_or(0),
        }
    }
}

impl From<RawTrack> for CatalogTrack {
    fn from(raw: RawTrack) -> Self {
        let artists = raw.artist_names();
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            uri: raw.uri,
            artists,
            album: raw.album.map(|a| a.name),
            popularity: raw.popularity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

impl From<RawArtist> for TopArtist {
    fn from(raw: RawArtist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            genres: raw.genres,
            popularity: raw.popularity.unwrap_or(0),
        }
    }
}

impl From<RawArtist> for CatalogArtist {
    fn from(raw: RawArtist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            genres: raw.genres,
            popularity: raw.popularity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackSearchResponse {
    pub tracks: Paging<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistSearchResponse {
    pub artists: Paging<RawArtist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackUriResponse {
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<RawImage>,
}

impl From<RawUser> for SpotifyUser {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            display_name: raw.display_name.filter(|s| !s.is_empty()),
            email: raw.email.filter(|s| !s.is_empty()),
            profile_image: raw.images.into_iter().next().map(|i| i.url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaylist {
    pub id: String,
    pub name: String,
    pub uri: Option<String>,
    pub external_urls: Option<RawExternalUrls>,
}

impl From<RawPlaylist> for CreatedPlaylist {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            uri: raw.uri,
            external_url: raw.external_urls.and_then(|u| u.spotify),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddTracksRequest<'a> {
    pub uris: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotResponse {
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSavedTrack {
    pub added_at: Option<String>,
    pub track: Option<RawTrack>,
}

/// Spotify error envelope: `{"error": {"status": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
