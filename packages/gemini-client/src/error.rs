//! Error types for the Gemini client

use thiserror::Error;

/// Errors that can occur when interacting with Gemini
#[derive(Error, Debug)]
pub enum GeminiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize/deserialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gemini API returned an error status
    #[error("Gemini API error: {0}")]
    Api(String),

    /// The configured model does not exist or is not available to this key
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Request timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Could not connect to the API host
    #[error("Connection refused. Is Gemini reachable at {0}?")]
    ConnectionRefused(String),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Prompt or output was blocked by safety filters
    #[error("Generation blocked: {0}")]
    Blocked(String),

    /// Stream finished without producing any text
    #[error("Gemini returned no text")]
    EmptyResponse,
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
