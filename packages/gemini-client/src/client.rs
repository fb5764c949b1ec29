//! Gemini HTTP client with server-sent-event streaming

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{future, Stream, StreamExt};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use vibelist_shared_config::GeminiConfig;

use crate::error::{GeminiError, GeminiResult};
use crate::models::{ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Stream of generated text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = GeminiResult<String>> + Send>>;

/// Gemini API client with connection pooling
///
/// No retries are attempted; callers decide whether a failed generation
/// is worth repeating.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> GeminiResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(GeminiError::Http)?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Create a client with custom HTTP client (for testing)
    pub fn with_client(config: &GeminiConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config: config.clone(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GeminiConfig {
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

    fn map_send_error(&self, e: reqwest::Error) -> GeminiError {
        if e.is_connect() {
            GeminiError::ConnectionRefused(self.config.api_url.clone())
        } else if e.is_timeout() {
            GeminiError::Timeout(self.config.timeout_secs)
        } else {
            GeminiError::Http(e)
        }
    }

    async fn error_from_response(&self, response: reqwest::Response) -> GeminiError {
        let status = response.status();
        let body = Self::truncate_error_body(response.text().await.unwrap_or_default());
        let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();

        let not_found = status == StatusCode::NOT_FOUND
            || parsed
                .as_ref()
                .and_then(|e| e.error.status.as_deref())
                .is_some_and(|s| s == "NOT_FOUND");
        if not_found {
            return GeminiError::ModelNotFound(self.config.model.clone());
        }

        let message = parsed.map(|e| e.error.message).unwrap_or(body);
        GeminiError::Api(format!("Status {}: {}", status, message))
    }

    /// Check if Gemini is reachable and the configured model exists
    pub async fn health_check(&self) -> GeminiResult<bool> {
        match self
            .http_client
            .get(self.config.model_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => Err(self.map_send_error(e)),
        }
    }

    /// Stream generated text for a prompt
    ///
    /// Each item is one text fragment as Gemini produced it. Chunks that
    /// carry no text are skipped; a safety block ends the stream with
    /// [`GeminiError::Blocked`].
    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    pub async fn generate_stream(&self, prompt: &str) -> GeminiResult<TextStream> {
        let request = GenerateContentRequest::user_prompt(
            prompt,
            GenerationConfig {
                temperature: Some(self.config.temperature),
                max_output_tokens: Some(self.config.max_tokens),
            },
        );

        let response = self
            .http_client
            .post(self.config.stream_generate_url())
            .query(&[("alt", "sse")])
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        debug!("Streaming generation started");

        let fragments = SseStream::new(response.bytes_stream())
            .map(|chunk| {
                let chunk = chunk?;
                if let Some(reason) = chunk.block_reason() {
                    return Err(GeminiError::Blocked(reason));
                }
                Ok(chunk.text())
            })
            .filter(|fragment| future::ready(!matches!(fragment, Ok(text) if text.is_empty())));

        Ok(Box::pin(fragments))
    }

    /// Generate text for a prompt, consuming the stream to completion
    ///
    /// Any error in the middle of the stream fails the whole call.
    pub async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        let mut stream = self.generate_stream(prompt).await?;
        let mut text = String::new();
        let mut fragments = 0usize;

        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment?);
            fragments += 1;
        }

        debug!(fragments, response_len = text.len(), "Generation complete");

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

/// A stream adapter that parses server-sent events from a byte stream
///
/// Only `data:` fields are used. Each one holds a complete JSON response
/// chunk. Comments, `event:`/`id:` fields and blank lines are ignored.
struct SseStream<S> {
    inner: S,
    buffer: Vec<u8>,
    finished: bool,
}

impl<S> SseStream<S> {
    fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Remove one complete line from the buffer
    ///
    /// Bytes are decoded only once the whole line has arrived, so a
    /// multi-byte character split across network chunks stays intact.
    fn take_line(&mut self) -> Option<String> {
        let newline_pos = self.buffer.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        let line = decode_line(&line[..newline_pos]);
        Some(line.trim_end_matches('\r').to_string())
    }

    fn parse_line(line: &str) -> Option<GeminiResult<GenerateContentResponse>> {
        let data = line.strip_prefix("data:")?.trim();
        if data.is_empty() || data == "[DONE]" {
            return None;
        }
        Some(serde_json::from_str(data).map_err(GeminiError::from))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(line) => line,
        Err(e) => {
            warn!(
                error = %e,
                byte_count = bytes.len(),
                "Invalid UTF-8 in streaming response, using lossy conversion"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = GeminiResult<GenerateContentResponse>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            while let Some(line) = self.take_line() {
                if let Some(item) = Self::parse_line(&line) {
                    return Poll::Ready(Some(item));
                }
            }

            if self.finished {
                // Final line without a trailing newline
                let rest = decode_line(&std::mem::take(&mut self.buffer));
                return Poll::Ready(Self::parse_line(rest.trim()));
            }

            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => self.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(GeminiError::InvalidResponse(e.to_string()))))
                }
                Poll::Ready(None) => self.finished = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
