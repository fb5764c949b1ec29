//! Recommendation Generator
//!
//! Builds the generation prompt from the mood text and the listening
//! profile, streams the model's answer and hands back the whole text.

use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, instrument, warn};
use vibelist_gemini_client::{GeminiClient, GeminiError};

use super::{RecommendationError, RecommendationResult, UserProfile};

/// Number of tracks the model is asked for
pub const RECOMMENDATION_COUNT: usize = 20;

fn generator_error(err: GeminiError) -> RecommendationError {
    warn!(error = %err, "Generation failed");
    RecommendationError::GeneratorError(err.to_string())
}

/// Render the generation prompt
///
/// The profile goes in as two JSON arrays so the model sees exactly the
/// fields the user's taste is described by.
pub fn build_prompt(prompt: &str, notes: Option<&str>, profile: &UserProfile) -> String {
    let top_artists = json!(profile.top_artists);
    let top_tracks = json!(profile.top_tracks);

    let mut text = format!(
        "You are a music curator building a Spotify playlist.\n\
         \n\
         Mood or theme: {prompt}\n\
         \n\
         The listener's top artists: {top_artists}\n\
         The listener's top tracks: {top_tracks}\n\
         \n\
         Recommend exactly {count} songs that fit the mood. Prefer songs by the \
         listener's top artists, or their top tracks, whenever they fit the theme. \
         Every song must be justifiable by its genre or by its theme.\n",
        prompt = prompt.trim(),
        count = RECOMMENDATION_COUNT,
    );

    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        text.push_str(&format!("\nAdditional guidance from the listener: {}\n", notes));
    }

    text.push_str(
        "\nRespond with a JSON array only, with no commentary before or after it. \
         Each element must be an object of the form {\"track\": \"<song title>\", \
         \"artist\": \"<artist name>\"}.",
    );
    text
}

/// Generates candidate lists and playlist descriptions
#[derive(Clone)]
pub struct RecommendationGenerator {
    gemini: GeminiClient,
}

impl RecommendationGenerator {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Ask for recommendations and return the full, concatenated answer
    ///
    /// Fragments are collected until the stream ends; a failing fragment
    /// fails the whole generation.
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        notes: Option<&str>,
        profile: &UserProfile,
    ) -> RecommendationResult<String> {
        let request = build_prompt(prompt, notes, profile);
        let mut stream = self
            .gemini
            .generate_stream(&request)
            .await
            .map_err(generator_error)?;

        let mut text = String::new();
        let mut fragments = 0usize;
        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment.map_err(generator_error)?);
            fragments += 1;
        }

        debug!(fragments, bytes = text.len(), "Generation finished");
        Ok(text)
    }

    /// Short free-text description of a playlist for a mood
    #[instrument(skip(self))]
    pub async fn describe_playlist(&self, mood: &str) -> RecommendationResult<String> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(RecommendationError::InvalidInput(
                "mood is required".to_string(),
            ));
        }

        let prompt = format!("Briefly describe a playlist that fits the mood: {}", mood);
        let text = self
            .gemini
            .generate_text(&prompt)
            .await
            .map_err(generator_error)?;
        Ok(text.trim().to_string())
    }
}
