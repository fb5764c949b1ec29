//! Orchestrator
//!
//! Runs the stages in order and owns the failure contract:
//!
//! `Started → ProfileFetched → Generated → Parsed → Resolved →
//! PlaylistCreated → TracksAdded`, or `Failed(kind)` from any of them.
//!
//! The prompt is stored right after `Started`, so failed runs still leave
//! it behind. The local playlist row is written after Spotify confirms the
//! playlist and before tracks are added; nothing is rolled back when a
//! later step fails.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vibelist_gemini_client::GeminiClient;
use vibelist_spotify_client::SpotifyClient;

use super::materializer::{
    playlist_description, playlist_name, MAX_PLAYLIST_NAME_LENGTH, PLAYLIST_NAME_SUFFIX,
};
use super::{
    parse_recommendations, CandidateTrack, CatalogResolver, PlaylistMaterializer,
    ProfileFetcher, RecommendationError, RecommendationGenerator, RecommendationResult,
    ResolvedTrack, SessionContext,
};
use crate::models::{NewPlaylist, NewPlaylistTrack, NewPrompt};
use crate::repositories::RecommendationStore;

/// Longest accepted prompt, in characters; the derived playlist name must
/// still fit its column
pub const MAX_PROMPT_LENGTH: usize = MAX_PLAYLIST_NAME_LENGTH - PLAYLIST_NAME_SUFFIX.len();

/// Pipeline states reached by a successful run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Started,
    ProfileFetched,
    Generated,
    Parsed,
    Resolved,
    PlaylistCreated,
    TracksAdded,
}

impl PipelineStage {
    /// The only stage that may follow this one
    pub fn next(self) -> Option<Self> {
        use PipelineStage::*;
        match self {
            Started => Some(ProfileFetched),
            ProfileFetched => Some(Generated),
            Generated => Some(Parsed),
            Parsed => Some(Resolved),
            Resolved => Some(PlaylistCreated),
            PlaylistCreated => Some(TracksAdded),
            TracksAdded => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks and logs the state of one run
struct PipelineRun {
    id: Uuid,
    stage: PipelineStage,
}

impl PipelineRun {
    fn start(spotify_user_id: &str) -> Self {
        let run = Self {
            id: Uuid::new_v4(),
            stage: PipelineStage::Started,
        };
        info!(run_id = %run.id, spotify_user_id, stage = %run.stage, "Recommendation run started");
        run
    }

    fn advance(&mut self, next: PipelineStage) {
        debug_assert_eq!(self.stage.next(), Some(next), "stages advance one at a time");
        info!(run_id = %self.id, from = %self.stage, to = %next, "Pipeline transition");
        self.stage = next;
    }

    fn fail(&self, err: RecommendationError) -> RecommendationError {
        warn!(
            run_id = %self.id,
            from = %self.stage,
            to = "Failed",
            kind = err.kind(),
            error = %err,
            "Pipeline transition"
        );
        err
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylist {
    pub prompt_id: Uuid,
    /// Local playlist id
    pub playlist_id: Uuid,
    pub spotify_playlist_id: String,
    pub playlist_name: String,
    pub track_count: usize,
    pub not_found: Vec<CandidateTrack>,
    pub recommendations: Vec<ResolvedTrack>,
}

/// End-to-end recommendation pipeline
#[derive(Clone)]
pub struct RecommendationPipeline {
    store: Arc<dyn RecommendationStore>,
    profiles: ProfileFetcher,
    generator: RecommendationGenerator,
    resolver: CatalogResolver,
    materializer: PlaylistMaterializer,
}

impl RecommendationPipeline {
    pub fn new(
        store: Arc<dyn RecommendationStore>,
        spotify: SpotifyClient,
        gemini: GeminiClient,
    ) -> Self {
        Self {
            store,
            profiles: ProfileFetcher::new(spotify.clone()),
            generator: RecommendationGenerator::new(gemini),
            resolver: CatalogResolver::new(spotify.clone()),
            materializer: PlaylistMaterializer::new(spotify),
        }
    }

    pub fn generator(&self) -> &RecommendationGenerator {
        &self.generator
    }

    /// Generate a playlist for `prompt` in the session user's account
    #[instrument(skip_all, fields(spotify_user_id = %ctx.spotify_user_id))]
    pub async fn generate_recommendations(
        &self,
        prompt: &str,
        notes: Option<&str>,
        ctx: &SessionContext,
    ) -> RecommendationResult<GeneratedPlaylist> {
        let prompt = validate_prompt(prompt)?;
        ctx.validate()?;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        let mut run = PipelineRun::start(&ctx.spotify_user_id);
        let result = self.run_stages(&mut run, prompt, notes, ctx).await;
        result.map_err(|err| run.fail(err))
    }

    async fn run_stages(
        &self,
        run: &mut PipelineRun,
        prompt: &str,
        notes: Option<&str>,
        ctx: &SessionContext,
    ) -> RecommendationResult<GeneratedPlaylist> {
        let user = self
            .store
            .find_user_by_spotify_id(&ctx.spotify_user_id)
            .await?
            .ok_or_else(|| RecommendationError::UserNotFound {
                spotify_id: ctx.spotify_user_id.clone(),
            })?;

        let stored_prompt = self
            .store
            .save_prompt(NewPrompt {
                user_id: user.id,
                mood: prompt.to_string(),
                additional_notes: notes.map(str::to_string),
            })
            .await?;
        debug!(prompt_id = %stored_prompt.id, "Stored prompt");

        let profile = self.profiles.fetch(ctx).await?;
        run.advance(PipelineStage::ProfileFetched);

        let raw = self.generator.generate(prompt, notes, &profile).await?;
        run.advance(PipelineStage::Generated);

        let candidates = parse_recommendations(&raw)?;
        run.advance(PipelineStage::Parsed);

        let resolution = self.resolver.resolve(ctx, candidates).await;
        if resolution.is_empty() {
            return Err(RecommendationError::NoResolvableTracks {
                not_found: resolution.not_found,
            });
        }
        run.advance(PipelineStage::Resolved);

        let name = playlist_name(prompt);
        let created = self
            .materializer
            .create(ctx, &name, &playlist_description(prompt))
            .await?;
        run.advance(PipelineStage::PlaylistCreated);

        let playlist = self
            .store
            .save_playlist(NewPlaylist {
                user_id: user.id,
                prompt_id: stored_prompt.id,
                spotify_playlist_id: created.id.clone(),
                playlist_name: created.name.clone(),
            })
            .await
            .map_err(|e| RecommendationError::TrackAdditionFailed {
                playlist_id: None,
                spotify_playlist_id: created.id.clone(),
                reason: format!("recording playlist failed: {}", e),
            })?;

        self.materializer
            .add_tracks(ctx, &created.id, Some(playlist.id), &resolution.uris())
            .await?;
        run.advance(PipelineStage::TracksAdded);

        self.record_tracks(playlist.id, &resolution.resolved).await;

        Ok(GeneratedPlaylist {
            prompt_id: stored_prompt.id,
            playlist_id: playlist.id,
            spotify_playlist_id: created.id,
            playlist_name: playlist.playlist_name,
            track_count: resolution.resolved.len(),
            not_found: resolution.not_found,
            recommendations: resolution.resolved,
        })
    }

    /// Mirror the added tracks locally; the remote playlist is already
    /// complete, so failures are only logged
    async fn record_tracks(&self, playlist_id: Uuid, tracks: &[ResolvedTrack]) {
        for (position, track) in tracks.iter().enumerate() {
            let entry = NewPlaylistTrack {
                spotify_track_id: track.track_id.clone(),
                track_name: track.candidate.track.clone(),
                artist_name: track.candidate.artist.clone(),
                position: i32::try_from(position).unwrap_or(i32::MAX),
            };
            if let Err(e) = self.store.add_track_to_playlist(playlist_id, entry).await {
                warn!(%playlist_id, track_id = %track.track_id, error = %e, "Failed to record playlist track");
            }
        }
    }
}

fn validate_prompt(prompt: &str) -> RecommendationResult<&str> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(RecommendationError::InvalidInput(
            "prompt is required".to_string(),
        ));
    }
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(RecommendationError::InvalidInput(format!(
            "prompt must be at most {} characters",
            MAX_PROMPT_LENGTH
        )));
    }
    Ok(prompt)
}
