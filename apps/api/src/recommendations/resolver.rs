//! Catalog Resolver
//!
//! Maps each candidate to a Spotify track: a field-filtered search first,
//! a plain keyword search second, then a track lookup for the playable URI.
//! A candidate that fails any step is reported in `not_found`; it never
//! fails the run.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use vibelist_spotify_client::{CatalogTrack, SpotifyClient};

use super::{CandidateTrack, SessionContext};

/// A candidate matched to a catalog track
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    #[serde(flatten)]
    pub candidate: CandidateTrack,
    pub track_id: String,
    pub uri: String,
}

/// Outcome of resolving a candidate list, both halves in generator order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub resolved: Vec<ResolvedTrack>,
    pub not_found: Vec<CandidateTrack>,
}

impl Resolution {
    /// Playable URIs of the resolved tracks
    pub fn uris(&self) -> Vec<String> {
        self.resolved.iter().map(|t| t.uri.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

enum Outcome {
    Resolved(ResolvedTrack),
    Unresolved(CandidateTrack),
}

/// Exact-field query: `track:"<title>" artist:"<artist>"`
pub fn strict_query(candidate: &CandidateTrack) -> String {
    format!(
        "track:\"{}\" artist:\"{}\"",
        candidate.track.replace('"', ""),
        candidate.artist.replace('"', "")
    )
}

/// Unquoted keyword query: `<title> <artist>`
pub fn loose_query(candidate: &CandidateTrack) -> String {
    format!("{} {}", candidate.track, candidate.artist)
}

/// Resolves candidates against the Spotify catalog
#[derive(Clone)]
pub struct CatalogResolver {
    spotify: SpotifyClient,
    concurrency: usize,
}

impl CatalogResolver {
    /// Concurrency comes from the client config; 1 resolves sequentially
    pub fn new(spotify: SpotifyClient) -> Self {
        let concurrency = spotify.config().resolve_concurrency.max(1);
        Self {
            spotify,
            concurrency,
        }
    }

    /// Resolve every candidate, preserving input order in both outputs
    #[instrument(skip_all, fields(candidates = candidates.len(), concurrency = self.concurrency))]
    pub async fn resolve(
        &self,
        ctx: &SessionContext,
        candidates: Vec<CandidateTrack>,
    ) -> Resolution {
        let outcomes: Vec<Outcome> = stream::iter(candidates)
            .map(|candidate| self.resolve_one(ctx, candidate))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut resolution = Resolution::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Resolved(track) => resolution.resolved.push(track),
                Outcome::Unresolved(candidate) => resolution.not_found.push(candidate),
            }
        }

        debug!(
            resolved = resolution.resolved.len(),
            not_found = resolution.not_found.len(),
            "Resolution finished"
        );
        resolution
    }

    async fn resolve_one(&self, ctx: &SessionContext, candidate: CandidateTrack) -> Outcome {
        let hit = match self.first_match(ctx, &strict_query(&candidate)).await {
            Some(track) => Some(track),
            None => self.first_match(ctx, &loose_query(&candidate)).await,
        };

        let Some(track) = hit else {
            debug!(track = %candidate.track, artist = %candidate.artist, "No catalog match");
            return Outcome::Unresolved(candidate);
        };

        match self.spotify.get_track_uri(&ctx.token, &track.id).await {
            Ok(uri) => Outcome::Resolved(ResolvedTrack {
                candidate,
                track_id: track.id,
                uri,
            }),
            Err(e) => {
                warn!(
                    track = %candidate.track,
                    track_id = %track.id,
                    error = %e,
                    "Track URI lookup failed"
                );
                Outcome::Unresolved(candidate)
            }
        }
    }

    /// First search hit; a failed search counts as no results
    async fn first_match(&self, ctx: &SessionContext, query: &str) -> Option<CatalogTrack> {
        match self.spotify.search_tracks(&ctx.token, query).await {
            Ok(tracks) => tracks.into_iter().next(),
            Err(e) => {
                warn!(query, error = %e, "Track search failed");
                None
            }
        }
    }
}
