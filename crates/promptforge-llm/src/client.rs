use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::ChatMessage;

/// Errors reported by a completion backend.
///
/// Callers are expected to treat every variant the same way: the stage that
/// issued the request failed. The variants exist for logging, not for
/// branching on provider-specific causes.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion response contained no choices")]
    EmptyChoices,

    #[error("malformed completion response: {0}")]
    InvalidResponse(String),
}

/// A chat completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered conversation messages (system directive first)
    pub messages: Vec<ChatMessage>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Token budget for the response
    pub max_tokens: u32,
    /// Deterministic seed hint. Advisory only: providers are not required
    /// to honor it.
    pub seed: Option<u64>,
}

/// A successful completion
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text
    pub content: String,
    /// Model that actually served the request
    pub model: String,
}

/// The core abstraction over a hosted language model
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion call
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}
