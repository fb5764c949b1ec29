//! Response Parser
//!
//! Extracts `(track, artist)` pairs from the generator's answer. A fenced
//! code block wins over the surrounding text; otherwise the whole trimmed
//! answer must be the JSON array.

use serde::Deserialize;
use tracing::debug;

use super::{CandidateTrack, RecommendationError, RecommendationResult};

const FENCE: &str = "```";

#[derive(Deserialize)]
struct RawCandidate {
    track: String,
    artist: String,
}

/// A fenced block: its info string (e.g. `json`) and its body
struct FencedBlock<'a> {
    tag: &'a str,
    body: &'a str,
}

/// Split off the info string when the text after an opening fence starts
/// with one, e.g. "json\n[...]"
fn split_info_string(after_fence: &str) -> (&str, &str) {
    let line_end = after_fence.find('\n').unwrap_or(after_fence.len());
    let first_line = after_fence[..line_end].trim();
    if first_line.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        let body = after_fence.get(line_end + 1..).unwrap_or("");
        (first_line, body)
    } else {
        ("", after_fence)
    }
}

fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(FENCE) {
        let (tag, after_tag) = split_info_string(&rest[open + FENCE.len()..]);
        match after_tag.find(FENCE) {
            Some(close) => {
                blocks.push(FencedBlock {
                    tag,
                    body: &after_tag[..close],
                });
                rest = &after_tag[close + FENCE.len()..];
            }
            None => {
                // Unterminated fence: the answer was cut off mid-block
                blocks.push(FencedBlock {
                    tag,
                    body: after_tag,
                });
                break;
            }
        }
    }
    blocks
}

/// The part of the answer that should hold the JSON array
fn extract_payload(text: &str) -> &str {
    let blocks = fenced_blocks(text);
    let chosen = blocks
        .iter()
        .find(|b| b.tag.eq_ignore_ascii_case("json"))
        .or_else(|| blocks.first());

    match chosen {
        Some(block) => block.body.trim(),
        None => text.trim(),
    }
}

/// Parse generator output into ordered candidates
///
/// Entries with a blank title or artist are skipped. An answer that is not
/// a JSON array of `{track, artist}` objects, or that yields no usable
/// entry, is a `MalformedRecommendation` carrying the raw text.
pub fn parse_recommendations(raw: &str) -> RecommendationResult<Vec<CandidateTrack>> {
    let malformed = |reason: String| RecommendationError::MalformedRecommendation {
        reason,
        raw: raw.to_string(),
    };

    let payload = extract_payload(raw);
    let entries: Vec<RawCandidate> =
        serde_json::from_str(payload).map_err(|e| malformed(e.to_string()))?;

    let total = entries.len();
    let candidates: Vec<CandidateTrack> = entries
        .into_iter()
        .filter_map(|entry| {
            let track = entry.track.trim();
            let artist = entry.artist.trim();
            (!track.is_empty() && !artist.is_empty()).then(|| CandidateTrack::new(track, artist))
        })
        .collect();

    if candidates.is_empty() {
        return Err(malformed("no track/artist pairs in response".to_string()));
    }

    debug!(
        candidates = candidates.len(),
        skipped = total - candidates.len(),
        "Parsed recommendations"
    );
    Ok(candidates)
}
