//! Mock Gemini server for testing streamed generation
//!
//! Provides a [`MockGeminiServer`] that answers `streamGenerateContent`
//! with server-sent events, so generator tests exercise the real stream
//! parser.

use serde_json::{json, Value};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = r".*:streamGenerateContent$";

/// Mock Gemini server
///
/// The model segment of the path is not matched, so any configured model
/// name works.
pub struct MockGeminiServer {
    server: MockServer,
}

impl MockGeminiServer {
    /// Start a new mock Gemini server
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

    fn sse_body(chunks: &[Value]) -> String {
        chunks
            .iter()
            .map(|chunk| format!("data: {}\r\n\r\n", chunk))
            .collect()
    }

    fn text_chunk(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]}
            }]
        })
    }

    /// Split text into roughly `size`-byte pieces on character boundaries
    fn split_text(text: &str, size: usize) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if current.len() >= size {
                pieces.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }

    /// Mount a streamed response delivering `text` across several events
    pub async fn mock_stream_text(&self, text: &str) {
        let pieces = Self::split_text(text, 64);
        let pieces: Vec<&str> = pieces.iter().map(String::as_str).collect();
        self.mock_stream_chunks(&pieces).await;
    }

    /// Mount a streamed response with one event per fragment
    pub async fn mock_stream_chunks(&self, fragments: &[&str]) {
        let mut chunks: Vec<Value> = fragments.iter().map(|f| Self::text_chunk(f)).collect();
        chunks.push(json!({
            "candidates": [{"content": {"role": "model", "parts": []}, "finishReason": "STOP"}]
        }));

        Mock::given(method("POST"))
            .and(path_regex(STREAM_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(Self::sse_body(&chunks)),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a response blocked by the safety filter
    pub async fn mock_blocked(&self, reason: &str) {
        let chunk = json!({"promptFeedback": {"blockReason": reason}});

        Mock::given(method("POST"))
            .and(path_regex(STREAM_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(Self::sse_body(&[chunk])),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing generation call
    pub async fn mock_failure(&self, status_code: u16, error_message: &str) {
        Mock::given(method("POST"))
            .and(path_regex(STREAM_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"code": status_code, "message": error_message, "status": "UNAVAILABLE"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a delayed response, for timeout tests
    pub async fn mock_timeout(&self, delay_ms: u64) {
        Mock::given(method("POST"))
            .and(path_regex(STREAM_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_millis(delay_ms))
                    .set_body_string(Self::sse_body(&[Self::text_chunk("late")])),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount the model metadata endpoint used by health checks
    pub async fn mock_model_available(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/v1beta/models/[^/:]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/gemini-2.0-flash",
                "displayName": "Gemini 2.0 Flash"
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of generation requests received
    pub async fn generate_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().ends_with(":streamGenerateContent"))
            .count()
    }

    /// Prompt text of every generation request, in order
    pub async fn received_prompts(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with(":streamGenerateContent"))
            .filter_map(|r| {
                let body: Value = r.body_json().ok()?;
                body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .map(str::to_string)
            })
            .collect()
    }
}
