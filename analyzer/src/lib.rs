//! # Analyzer
//!
//! Orchestrates one "analyze profile" request and the reply-drafting assistant on top of
//! the classifier, LLM client, history cache and reply-length policy.
//!
//! ## External interactions
//!
//! - **Platform**: [`PlatformSource`] fetches user metadata and content
//! - **LLM**: [`llm_client::LlmClient`], wrapped in timeout + retry
//! - **Storage**: [`profile_history::HistoryService`]
//!
//! [`AnalyzeError::user_message`] is the single place errors become user-facing text.

mod error;
mod generate;
mod parse;
mod pipeline;
mod reply;
mod settings;
mod source;

pub use error::AnalyzeError;
pub use parse::parse_profile;
pub use pipeline::{AnalyzeRequest, AnalyzeResponse, DebugInfo, ProfileAnalyzer, Timing};
pub use reply::{ReplyDraft, ReplyDrafter, ReplyRequest};
pub use settings::AnalyzerSettings;
pub use source::{rank_by_relevance, ContentBatch, PlatformSource, SourceError};
