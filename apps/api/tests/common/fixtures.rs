//! Pipeline fixtures: mock upstreams, a seeded store, canned model output

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use vibelist_api::models::{UpsertUser, User};
use vibelist_api::recommendations::{RecommendationPipeline, SessionContext};
use vibelist_api::repositories::RecommendationStore;
use vibelist_gemini_client::GeminiClient;
use vibelist_shared_config::{GeminiConfig, SpotifyConfig};
use vibelist_spotify_client::{AccessToken, SpotifyClient};
use vibelist_test_utils::{MockGeminiServer, MockSpotifyServer};

use super::store::InMemoryStore;

pub const TEST_TOKEN: &str = "test-access-token";
pub const SPOTIFY_USER_ID: &str = "listener-1";
pub const SPOTIFY_PLAYLIST_ID: &str = "pl-late-night";

/// Twenty recommendations for a "late night drive" mood
pub const LATE_NIGHT_TRACKS: [(&str, &str); 20] = [
    ("Midnight City", "M83"),
    ("Nightcall", "Kavinsky"),
    ("Greedy", "Tate McRae"),
    ("Blinding Lights", "The Weeknd"),
    ("Drive", "The Cars"),
    ("Dreams", "Fleetwood Mac"),
    ("Redbone", "Childish Gambino"),
    ("Motion Sickness", "Phoebe Bridgers"),
    ("Night Drive", "Chromatics"),
    ("Tadow", "Masego"),
    ("Oblivion", "Grimes"),
    ("Runaway", "Kanye West"),
    ("Sweater Weather", "The Neighbourhood"),
    ("Pink + White", "Frank Ocean"),
    ("Slow Dancing in the Dark", "Joji"),
    ("Do I Wanna Know?", "Arctic Monkeys"),
    ("Borderline", "Tame Impala"),
    ("Nights", "Frank Ocean"),
    ("Tennis Court", "Lorde"),
    ("Exit Music", "Radiohead"),
];

/// Catalog id used for a fixture track
pub fn track_id(index: usize) -> String {
    format!("trk{:02}", index)
}

/// Model output wrapping `tracks` in a fenced JSON block with chatter around it
pub fn fenced_json(tracks: &[(&str, &str)]) -> String {
    let items: Vec<_> = tracks
        .iter()
        .map(|(track, artist)| json!({"track": track, "artist": artist}))
        .collect();
    let body = serde_json::to_string_pretty(&items).expect("serialize fixture");
    format!(
        "Here is a playlist for your night out:\n```json\n{}\n```\nEnjoy the ride!",
        body
    )
}

/// Pipeline wired to mock upstreams and an in-memory store seeded with one user
pub struct PipelineHarness {
    pub spotify: MockSpotifyServer,
    pub gemini: MockGeminiServer,
    pub store: Arc<InMemoryStore>,
    pub user: User,
}

impl PipelineHarness {
    pub async fn start() -> Self {
        let spotify = MockSpotifyServer::start().await;
        let gemini = MockGeminiServer::start().await;
        let store = Arc::new(InMemoryStore::new());

        let (user, _) = store
            .save_user(UpsertUser {
                spotify_id: SPOTIFY_USER_ID.to_string(),
                email: Some("listener@example.com".to_string()),
                display_name: Some("Listener".to_string()),
                profile_image: None,
            })
            .await
            .expect("seed user");

        Self {
            spotify,
            gemini,
            store,
            user,
        }
    }

    pub fn spotify_config(&self) -> SpotifyConfig {
        SpotifyConfig::with_url(self.spotify.url())
    }

    pub fn spotify_client(&self) -> SpotifyClient {
        SpotifyClient::new(&self.spotify_config()).expect("spotify client")
    }

    pub fn gemini_client(&self) -> GeminiClient {
        GeminiClient::new(&GeminiConfig::with_url(self.gemini.url())).expect("gemini client")
    }

    pub fn pipeline(&self) -> RecommendationPipeline {
        self.pipeline_with(self.spotify_config())
    }

    pub fn pipeline_with(&self, spotify_config: SpotifyConfig) -> RecommendationPipeline {
        RecommendationPipeline::new(
            self.store.clone(),
            SpotifyClient::new(&spotify_config).expect("spotify client"),
            self.gemini_client(),
        )
    }

    pub fn context(&self) -> SessionContext {
        SessionContext::new(AccessToken::new(TEST_TOKEN), SPOTIFY_USER_ID)
    }

    /// Listening profile with Tate McRae as the top artist
    pub async fn mock_profile(&self) {
        self.spotify
            .mock_top_tracks(&[("Greedy", "Tate McRae"), ("Nightcall", "Kavinsky")])
            .await;
        self.spotify
            .mock_top_artists(&[("Tate McRae", &["pop"], 94), ("M83", &["synthpop"], 70)])
            .await;
    }

    /// Strict-search hits and URI lookups for every track in `tracks`
    pub async fn mock_resolvable(&self, tracks: &[(&str, &str)]) {
        for (index, (title, artist)) in tracks.iter().enumerate() {
            self.spotify
                .mock_resolvable_track(title, artist, &track_id(index))
                .await;
        }
    }

    pub async fn mock_playlist_target(&self) {
        self.spotify
            .mock_create_playlist(SPOTIFY_USER_ID, SPOTIFY_PLAYLIST_ID)
            .await;
        self.spotify.mock_add_tracks(SPOTIFY_PLAYLIST_ID).await;
    }

    /// Everything needed for a fully successful run over `tracks`
    pub async fn mock_happy_path(&self, tracks: &[(&str, &str)]) {
        self.mock_profile().await;
        self.gemini.mock_stream_text(&fenced_json(tracks)).await;
        self.spotify.mock_search_empty().await;
        self.mock_resolvable(tracks).await;
        self.mock_playlist_target().await;
    }
}
