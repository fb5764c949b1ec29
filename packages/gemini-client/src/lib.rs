//! Gemini API client for Vibelist recommendation generation
//!
//! This crate wraps the Generative Language API's streaming endpoint.
//! Output arrives as server-sent events and is exposed either as a stream of
//! text fragments or, for callers that need the whole answer, as one
//! concatenated string.
//!
//! # Thread Safety
//!
//! `GeminiClient` is `Clone + Send + Sync` and shares one HTTP connection
//! pool across clones.
//!
//! # Example
//!
//! ```no_run
//! use vibelist_gemini_client::GeminiClient;
//! use vibelist_shared_config::GeminiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(&GeminiConfig::from_env()?)?;
//!
//! // Whole response
//! let text = client.generate_text("Suggest three songs for a rainy day").await?;
//! println!("{}", text);
//!
//! // Fragment by fragment
//! use futures_util::StreamExt;
//! let mut stream = client.generate_stream("Name one song").await?;
//! while let Some(fragment) = stream.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::{GeminiClient, TextStream};
pub use error::{GeminiError, GeminiResult};
pub use models::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PromptFeedback,
};
