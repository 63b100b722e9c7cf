//! Text-generation provider interface
//!
//! The rest of the service treats the provider as an opaque, failable
//! capability: given a prompt, return text or fail. The concrete OpenAI
//! client lives in [`openai`]; tests substitute their own implementations.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a text-generation provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request failed or timed out
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("completion API returned status {status}: {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    /// The provider answered successfully but with no usable text
    #[error("completion API returned no content")]
    EmptyCompletion,
}

/// An opaque, failable text-generation capability
#[async_trait]
pub trait Provider: Send + Sync {
    /// Produces a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
