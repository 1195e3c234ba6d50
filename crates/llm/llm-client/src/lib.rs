//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible HTTP implementation that works
//! with every provider in [`LlmProvider`]. Transport-agnostic callers (classifier, analyzer)
//! only see [`ChatMessage`] in and [`Generation`] out.
//!
//! Errors stay mechanical ([`LlmError`]); mapping them to user-facing copy happens in the analyzer.

use async_trait::async_trait;
use prompt::ChatMessage;
use serde::{Deserialize, Serialize};

mod config;
mod error;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig, LlmProvider};
pub use error::LlmError;
pub use openai_llm::OpenAiCompatibleClient;

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One completed LLM call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub content: String,
    /// Model name reported by the provider (falls back to the requested model).
    pub model: String,
    pub duration_ms: u64,
    pub usage: Option<TokenUsage>,
}

/// LLM client interface: one chat completion per call, no retries.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Generation, LlmError>;
}

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[len - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}
