//! Recommendation pipeline integration tests
//!
//! Every upstream is a wiremock server and the store is in memory, so each
//! test observes exactly which remote calls a run makes and what it records.

mod common;

use assert_matches::assert_matches;
use serde_json::json;
use vibelist_api::recommendations::materializer::MAX_PLAYLIST_NAME_LENGTH;
use vibelist_api::recommendations::orchestrator::MAX_PROMPT_LENGTH;
use vibelist_api::recommendations::{CandidateTrack, RecommendationError};
use vibelist_test_utils::MockSpotifyServer;

use common::{fenced_json, track_id, PipelineHarness, LATE_NIGHT_TRACKS, SPOTIFY_PLAYLIST_ID};

fn uri(index: usize) -> String {
    format!("spotify:track:{}", track_id(index))
}

// =============================================================================
// Successful runs
// =============================================================================

#[tokio::test]
async fn test_late_night_drive_creates_full_playlist() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS).await;

    let result = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .expect("run should succeed");

    assert_eq!(result.track_count, 20);
    assert!(result.not_found.is_empty());
    assert_eq!(result.playlist_name, "late night drive Vibes");
    assert_eq!(result.spotify_playlist_id, SPOTIFY_PLAYLIST_ID);
    assert_eq!(result.recommendations.len(), 20);
    assert_eq!(result.recommendations[2].candidate.artist, "Tate McRae");

    // One add call with every URI in generator order
    let bodies = harness.spotify.add_tracks_bodies().await;
    assert_eq!(bodies.len(), 1);
    let expected: Vec<String> = (0..20).map(uri).collect();
    assert_eq!(bodies[0], json!({ "uris": expected }));

    // Profile reached the model
    let prompts = harness.gemini.received_prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("late night drive"));
    assert!(prompts[0].contains("Tate McRae"));

    // Prompt, playlist and tracks recorded locally
    let stored_prompts = harness.store.prompts();
    assert_eq!(stored_prompts.len(), 1);
    assert_eq!(stored_prompts[0].id, result.prompt_id);
    assert_eq!(stored_prompts[0].user_id, harness.user.id);

    let playlists = harness.store.playlists();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].id, result.playlist_id);
    assert_eq!(playlists[0].prompt_id, result.prompt_id);

    let tracks = harness.store.tracks();
    assert_eq!(tracks.len(), 20);
    assert_eq!(tracks[0].spotify_track_id, track_id(0));
    assert_eq!(tracks[19].position, 19);
}

#[tokio::test]
async fn test_notes_are_passed_to_generator_and_stored() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS[..3]).await;

    harness
        .pipeline()
        .generate_recommendations(
            "late night drive",
            Some("  no songs older than 2010  "),
            &harness.context(),
        )
        .await
        .expect("run should succeed");

    let prompts = harness.gemini.received_prompts().await;
    assert!(prompts[0].contains("no songs older than 2010"));
    assert_eq!(
        harness.store.prompts()[0].additional_notes.as_deref(),
        Some("no songs older than 2010")
    );
}

#[tokio::test]
async fn test_partial_resolution_adds_only_resolved_tracks() {
    let harness = PipelineHarness::start().await;
    let tracks = [
        ("Midnight City", "M83"),
        ("Unreleased Demo", "Nobody"),
        ("Nightcall", "Kavinsky"),
        ("Lost Single", "Ghost Band"),
        ("Greedy", "Tate McRae"),
        ("Dreams", "Fleetwood Mac"),
    ];

    harness.mock_profile().await;
    harness.gemini.mock_stream_text(&fenced_json(&tracks)).await;
    harness.spotify.mock_search_empty().await;
    harness.mock_playlist_target().await;

    // 0: strict hit
    harness
        .spotify
        .mock_resolvable_track("Midnight City", "M83", &track_id(0))
        .await;
    // 1: no hits anywhere
    // 2: strict miss, loose hit
    harness
        .spotify
        .mock_search_hit(
            &MockSpotifyServer::loose_query("Nightcall", "Kavinsky"),
            &track_id(2),
            "Nightcall",
            "Kavinsky",
        )
        .await;
    harness.spotify.mock_track_uri(&track_id(2)).await;
    // 3: strict hit, lookup fails
    harness
        .spotify
        .mock_search_hit(
            &MockSpotifyServer::strict_query("Lost Single", "Ghost Band"),
            &track_id(3),
            "Lost Single",
            "Ghost Band",
        )
        .await;
    harness.spotify.mock_track_uri_failure(&track_id(3), 404).await;
    // 4: strict search errors, loose hit
    harness
        .spotify
        .mock_search_failure(&MockSpotifyServer::strict_query("Greedy", "Tate McRae"), 500)
        .await;
    harness
        .spotify
        .mock_search_hit(
            &MockSpotifyServer::loose_query("Greedy", "Tate McRae"),
            &track_id(4),
            "Greedy",
            "Tate McRae",
        )
        .await;
    harness.spotify.mock_track_uri(&track_id(4)).await;
    // 5: strict hit
    harness
        .spotify
        .mock_resolvable_track("Dreams", "Fleetwood Mac", &track_id(5))
        .await;

    let result = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .expect("run should succeed");

    assert_eq!(result.track_count, 4);
    assert_eq!(
        result.not_found,
        vec![
            CandidateTrack::new("Unreleased Demo", "Nobody"),
            CandidateTrack::new("Lost Single", "Ghost Band"),
        ]
    );

    let resolved_ids: Vec<&str> = result
        .recommendations
        .iter()
        .map(|t| t.track_id.as_str())
        .collect();
    assert_eq!(resolved_ids, vec!["trk00", "trk02", "trk04", "trk05"]);

    let bodies = harness.spotify.add_tracks_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({ "uris": [uri(0), uri(2), uri(4), uri(5)] })
    );
    assert_eq!(harness.store.tracks().len(), 4);
}

#[tokio::test]
async fn test_unresolved_track_tries_strict_then_loose_query() {
    let harness = PipelineHarness::start().await;
    let tracks = [("Midnight City", "M83"), ("Unreleased Demo", "Nobody")];
    harness.mock_profile().await;
    harness.gemini.mock_stream_text(&fenced_json(&tracks)).await;
    harness.spotify.mock_search_empty().await;
    harness.mock_resolvable(&tracks[..1]).await;
    harness.mock_playlist_target().await;

    let result = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .expect("run should succeed");

    assert_eq!(result.not_found, vec![CandidateTrack::new("Unreleased Demo", "Nobody")]);

    let queries = harness.spotify.search_queries().await;
    assert_eq!(
        queries,
        vec![
            MockSpotifyServer::strict_query("Midnight City", "M83"),
            MockSpotifyServer::strict_query("Unreleased Demo", "Nobody"),
            MockSpotifyServer::loose_query("Unreleased Demo", "Nobody"),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_resolution_preserves_generator_order() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS).await;

    let mut config = harness.spotify_config();
    config.resolve_concurrency = 8;

    let result = harness
        .pipeline_with(config)
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .expect("run should succeed");

    let titles: Vec<&str> = result
        .recommendations
        .iter()
        .map(|t| t.candidate.track.as_str())
        .collect();
    let expected: Vec<&str> = LATE_NIGHT_TRACKS.iter().map(|(t, _)| *t).collect();
    assert_eq!(titles, expected);

    let bodies = harness.spotify.add_tracks_bodies().await;
    let expected_uris: Vec<String> = (0..20).map(uri).collect();
    assert_eq!(bodies[0]["uris"], json!(expected_uris));
}

// =============================================================================
// Failures before any remote side effect
// =============================================================================

#[tokio::test]
async fn test_blank_prompt_is_rejected_without_upstream_calls() {
    let harness = PipelineHarness::start().await;

    let err = harness
        .pipeline()
        .generate_recommendations("   ", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::InvalidInput(_));
    assert_eq!(harness.gemini.generate_calls().await, 0);
    assert!(harness.store.prompts().is_empty());
}

#[tokio::test]
async fn test_longest_prompt_produces_storable_playlist_name() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS[..2]).await;
    let prompt = "n".repeat(MAX_PROMPT_LENGTH);

    let result = harness
        .pipeline()
        .generate_recommendations(&prompt, None, &harness.context())
        .await
        .expect("run should succeed");

    assert_eq!(result.playlist_name.chars().count(), MAX_PLAYLIST_NAME_LENGTH);
    assert_eq!(harness.store.playlists()[0].playlist_name, result.playlist_name);
}

#[tokio::test]
async fn test_prompt_too_long_for_playlist_name_is_rejected_upfront() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS[..2]).await;
    let prompt = "n".repeat(MAX_PROMPT_LENGTH + 1);

    let err = harness
        .pipeline()
        .generate_recommendations(&prompt, None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::InvalidInput(_));
    assert_eq!(harness.spotify.create_playlist_calls().await, 0);
    assert_eq!(harness.gemini.generate_calls().await, 0);
    assert!(harness.store.prompts().is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_rejected_before_storing_prompt() {
    let harness = PipelineHarness::start().await;
    let ctx = vibelist_api::recommendations::SessionContext::new(
        vibelist_spotify_client::AccessToken::new(common::TEST_TOKEN),
        "stranger",
    );

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &ctx)
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::UserNotFound { spotify_id } if spotify_id == "stranger");
    assert!(harness.store.prompts().is_empty());
    assert_eq!(harness.gemini.generate_calls().await, 0);
}

#[tokio::test]
async fn test_profile_failure_is_upstream_unavailable() {
    let harness = PipelineHarness::start().await;
    harness.spotify.mock_top_tracks_failure(503).await;
    harness
        .spotify
        .mock_top_artists(&[("Tate McRae", &["pop"], 94)])
        .await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::UpstreamUnavailable(_));
    assert_eq!(harness.gemini.generate_calls().await, 0);
    // The prompt is recorded before the profile is fetched
    assert_eq!(harness.store.prompts().len(), 1);
    assert!(harness.store.playlists().is_empty());
}

#[tokio::test]
async fn test_generator_failure_stops_the_run() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness.gemini.mock_failure(500, "backend overloaded").await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::GeneratorError(_));
    assert_eq!(harness.spotify.search_calls().await, 0);
}

#[tokio::test]
async fn test_blocked_generation_is_generator_error() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness.gemini.mock_blocked("SAFETY").await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::GeneratorError(reason) if reason.contains("SAFETY"));
}

#[tokio::test]
async fn test_refusal_text_is_malformed_recommendation() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness.gemini.mock_stream_text("sorry, I can't help").await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::MalformedRecommendation { raw, .. } if raw == "sorry, I can't help");
    assert_eq!(harness.spotify.search_calls().await, 0);
    assert_eq!(harness.spotify.create_playlist_calls().await, 0);
}

#[tokio::test]
async fn test_nothing_resolvable_creates_no_playlist() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness
        .gemini
        .mock_stream_text(&fenced_json(&LATE_NIGHT_TRACKS))
        .await;
    harness.spotify.mock_search_empty().await;
    harness.mock_playlist_target().await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::NoResolvableTracks { ref not_found } if not_found.len() == 20);
    assert_eq!(
        err.to_string(),
        "none of the 20 recommended tracks could be found in the catalog"
    );
    // Strict and loose attempt for every candidate
    assert_eq!(harness.spotify.search_calls().await, 40);
    assert_eq!(harness.spotify.create_playlist_calls().await, 0);
    assert!(harness.store.playlists().is_empty());
}

// =============================================================================
// Failures around the remote playlist
// =============================================================================

#[tokio::test]
async fn test_playlist_creation_failure() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness
        .gemini
        .mock_stream_text(&fenced_json(&LATE_NIGHT_TRACKS[..2]))
        .await;
    harness.spotify.mock_search_empty().await;
    harness.mock_resolvable(&LATE_NIGHT_TRACKS[..2]).await;
    harness
        .spotify
        .mock_create_playlist_failure(common::SPOTIFY_USER_ID, 403)
        .await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(err, RecommendationError::PlaylistCreationFailed(_));
    assert!(harness.store.playlists().is_empty());
    assert!(harness.spotify.add_tracks_bodies().await.is_empty());
}

#[tokio::test]
async fn test_track_addition_failure_keeps_playlist_record() {
    let harness = PipelineHarness::start().await;
    harness.mock_profile().await;
    harness
        .gemini
        .mock_stream_text(&fenced_json(&LATE_NIGHT_TRACKS[..2]))
        .await;
    harness.spotify.mock_search_empty().await;
    harness.mock_resolvable(&LATE_NIGHT_TRACKS[..2]).await;
    harness
        .spotify
        .mock_create_playlist(common::SPOTIFY_USER_ID, SPOTIFY_PLAYLIST_ID)
        .await;
    harness
        .spotify
        .mock_add_tracks_failure(SPOTIFY_PLAYLIST_ID, 500)
        .await;

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    let playlists = harness.store.playlists();
    assert_eq!(playlists.len(), 1);
    assert_matches!(
        err,
        RecommendationError::TrackAdditionFailed { playlist_id, spotify_playlist_id, .. } => {
            assert_eq!(playlist_id, Some(playlists[0].id));
            assert_eq!(spotify_playlist_id, SPOTIFY_PLAYLIST_ID);
        }
    );
    assert!(harness.store.tracks().is_empty());
}

#[tokio::test]
async fn test_unrecorded_playlist_reports_remote_id() {
    let harness = PipelineHarness::start().await;
    harness.mock_happy_path(&LATE_NIGHT_TRACKS[..2]).await;
    harness.store.fail_playlist_writes();

    let err = harness
        .pipeline()
        .generate_recommendations("late night drive", None, &harness.context())
        .await
        .unwrap_err();

    assert_matches!(
        err,
        RecommendationError::TrackAdditionFailed { playlist_id: None, ref spotify_playlist_id, .. }
            if spotify_playlist_id == SPOTIFY_PLAYLIST_ID
    );
    assert_eq!(err.kind(), "TRACK_ADDITION_FAILED");
    assert!(harness.spotify.add_tracks_bodies().await.is_empty());
}
