//! # Prompt
//!
//! Builds the chat messages sent to LLM providers.
//!
//! ## Prompts
//!
//! - **Profile**: system instruction with the category's value-dimension labels + a user
//!   message assembled from explicit context and cleaned content items ([`profile`])
//! - **Classification**: asks for exactly one macro-category id ([`classify`])
//! - **Reply**: drafts a comment reply within the platform's length limit ([`reply`])
//!
//! Markup from scraped pages is stripped by [`clean_markup`] before it reaches a prompt.
//!
//! ## External interactions
//!
//! - **AI models**: output is sent to OpenAI-compatible chat completion APIs.

pub mod classify;
pub mod clean;
pub mod profile;
pub mod reply;

pub use classify::classification_messages;
pub use clean::{clean_markup, truncate_chars};
pub use profile::{
    assemble_profile_prompt, labels_for, profile_messages, profile_system_prompt,
    MAX_ITEM_CHARS, MAX_PROMPT_CHARS,
};
pub use reply::reply_messages;

/// Chat role; `as_str` gives the wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    /// Only appears in few-shot examples; models answer as this role.
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One element of a chat completion `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}
