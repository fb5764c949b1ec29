//! Mock Spotify Web API server
//!
//! Provides a [`MockSpotifyServer`] that simulates the Web API endpoints the
//! recommendation pipeline calls: listening profile, catalog search, track
//! lookup, current user, playlist creation and population, saved tracks.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Priority for catch-all mocks so specific mocks win
const FALLBACK_PRIORITY: u8 = 10;

/// Mock Spotify server for pipeline tests
///
/// This struct wraps a [`wiremock::MockServer`]; its URL is used as the
/// `SpotifyConfig::api_url` (no `/v1` segment needed).
///
/// # Example
///
/// ```rust,ignore
/// use vibelist_test_utils::MockSpotifyServer;
///
/// #[tokio::test]
/// async fn test_resolution() {
///     let server = MockSpotifyServer::start().await;
///     server.mock_search_empty().await;
///     server.mock_resolvable_track("Greedy", "Tate McRae", "t1").await;
///
///     let config = SpotifyConfig::with_url(server.url());
///     // ... run your test
/// }
/// ```
pub struct MockSpotifyServer {
    server: MockServer,
}

impl MockSpotifyServer {
    /// Start a new mock Spotify server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Field-filter query used for the first search attempt
    pub fn strict_query(title: &str, artist: &str) -> String {
        format!("track:\"{}\" artist:\"{}\"", title, artist)
    }

    /// Free-text query used when the strict search finds nothing
    pub fn loose_query(title: &str, artist: &str) -> String {
        format!("{} {}", title, artist)
    }

    fn track_json(id: &str, title: &str, artist: &str) -> Value {
        json!({
            "id": id,
            "name": title,
            "uri": format!("spotify:track:{}", id),
            "artists": [{"name": artist}],
            "album": {"name": format!("{} (Album)", title)},
            "popularity": 70
        })
    }

    fn error_json(status: u16, message: &str) -> Value {
        json!({"error": {"status": status, "message": message}})
    }

    /// Mount top tracks as `(title, artist)` pairs
    pub async fn mock_top_tracks(&self, tracks: &[(&str, &str)]) {
        let items: Vec<Value> = tracks
            .iter()
            .enumerate()
            .map(|(i, (title, artist))| Self::track_json(&format!("top{}", i), title, artist))
            .collect();

        Mock::given(method("GET"))
            .and(path("/me/top/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
            .mount(&self.server)
            .await;
    }

    /// Mount top artists as `(name, genres, popularity)`
    pub async fn mock_top_artists(&self, artists: &[(&str, &[&str], u32)]) {
        let items: Vec<Value> = artists
            .iter()
            .enumerate()
            .map(|(i, (name, genres, popularity))| {
                json!({
                    "id": format!("artist{}", i),
                    "name": name,
                    "genres": genres,
                    "popularity": popularity
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/me/top/artists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing top tracks endpoint
    pub async fn mock_top_tracks_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/me/top/tracks"))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "top tracks unavailable")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing top artists endpoint
    pub async fn mock_top_artists_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/me/top/artists"))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "top artists unavailable")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a search result for one exact query string
    pub async fn mock_search_hit(&self, query: &str, id: &str, title: &str, artist: &str) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [Self::track_json(id, title, artist)], "total": 1}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing search for one exact query string
    pub async fn mock_search_failure(&self, query: &str, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", query))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "search failed")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount an empty result for every search not matched by a specific mock
    pub async fn mock_search_empty(&self) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [], "total": 0}
            })))
            .with_priority(FALLBACK_PRIORITY)
            .mount(&self.server)
            .await;
    }

    /// Mount a successful track lookup returning `spotify:track:<id>`
    pub async fn mock_track_uri(&self, id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/tracks/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "uri": format!("spotify:track:{}", id)
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing track lookup
    pub async fn mock_track_uri_failure(&self, id: &str, status_code: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/tracks/{}", id)))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "lookup failed")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a track that resolves on the strict search plus its URI lookup
    pub async fn mock_resolvable_track(&self, title: &str, artist: &str, id: &str) {
        self.mock_search_hit(&Self::strict_query(title, artist), id, title, artist)
            .await;
        self.mock_track_uri(id).await;
    }

    /// Mount `/me` for the given account id
    pub async fn mock_current_user(&self, user_id: &str) {
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": user_id,
                "display_name": format!("{} display", user_id),
                "email": format!("{}@example.com", user_id),
                "images": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a successful playlist creation for an account
    pub async fn mock_create_playlist(&self, user_id: &str, playlist_id: &str) {
        let playlist_id = playlist_id.to_string();
        Mock::given(method("POST"))
            .and(path(format!("/users/{}/playlists", user_id)))
            .respond_with(move |request: &Request| {
                let name = request
                    .body_json::<Value>()
                    .ok()
                    .and_then(|body| body["name"].as_str().map(str::to_string))
                    .unwrap_or_default();
                ResponseTemplate::new(201).set_body_json(json!({
                    "id": playlist_id,
                    "name": name,
                    "uri": format!("spotify:playlist:{}", playlist_id),
                    "external_urls": {
                        "spotify": format!("https://open.spotify.com/playlist/{}", playlist_id)
                    }
                }))
            })
            .mount(&self.server)
            .await;
    }

    /// Mount a failing playlist creation for an account
    pub async fn mock_create_playlist_failure(&self, user_id: &str, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/users/{}/playlists", user_id)))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "cannot create playlist")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a successful add-items call for a playlist
    pub async fn mock_add_tracks(&self, playlist_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "snapshot-1"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing add-items call for a playlist
    pub async fn mock_add_tracks_failure(&self, playlist_id: &str, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_json(Self::error_json(status_code, "cannot add tracks")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount one page of saved tracks as `(id, title, artist)`
    pub async fn mock_saved_tracks(&self, tracks: &[(&str, &str, &str)], total: u32) {
        let items: Vec<Value> = tracks
            .iter()
            .map(|(id, title, artist)| {
                json!({
                    "added_at": "2024-01-01T00:00:00Z",
                    "track": Self::track_json(id, title, artist)
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/me/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "total": total,
                "limit": tracks.len(),
                "offset": 0,
                "next": null
            })))
            .mount(&self.server)
            .await;
    }

    async fn requests_matching(&self, verb: &str, pattern: &str) -> Vec<Request> {
        let matcher = segment_matcher(pattern);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.to_string() == verb && matcher(r.url.path()))
            .collect()
    }

    /// Number of search requests received
    pub async fn search_calls(&self) -> usize {
        self.requests_matching("GET", "/search").await.len()
    }

    /// Search queries received, in order
    pub async fn search_queries(&self) -> Vec<String> {
        self.requests_matching("GET", "/search")
            .await
            .into_iter()
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }

    /// Number of playlist creation requests received
    pub async fn create_playlist_calls(&self) -> usize {
        self.requests_matching("POST", "/users/*/playlists").await.len()
    }

    /// JSON bodies of every add-items request, in order
    pub async fn add_tracks_bodies(&self) -> Vec<Value> {
        self.requests_matching("POST", "/playlists/*/tracks")
            .await
            .into_iter()
            .filter_map(|r| r.body_json::<Value>().ok())
            .collect()
    }
}

/// Path matcher where `*` stands for exactly one path segment
fn segment_matcher(pattern: &str) -> impl Fn(&str) -> bool {
    let expected: Vec<String> = pattern.split('/').map(str::to_string).collect();
    move |candidate: &str| {
        let segments: Vec<&str> = candidate.split('/').collect();
        segments.len() == expected.len()
            && segments
                .iter()
                .zip(&expected)
                .all(|(seg, exp)| exp == "*" || seg == exp)
    }
}
