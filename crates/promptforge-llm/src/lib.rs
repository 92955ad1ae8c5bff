//! # promptforge-llm
//!
//! Completion client abstraction for promptforge.
//!
//! The pipeline treats the language model as a black box behind the
//! [`CompletionClient`] trait: a list of chat messages goes in, text comes
//! out, and every failure mode surfaces as a [`CompletionError`]. The
//! default implementation, [`OpenAiClient`], talks to any OpenAI-compatible
//! `/chat/completions` endpoint.

mod client;
mod message;
mod openai;

pub use client::{Completion, CompletionClient, CompletionError, CompletionRequest};
pub use message::{ChatMessage, ChatRole};
pub use openai::OpenAiClient;
