//! Analysis errors and the only mapping from errors to user-facing copy.

use llm_client::LlmError;
use profile_history::HistoryError;
use thiserror::Error;

use crate::source::SourceError;

// --- User-facing messages ---
const MSG_UNAUTHORIZED: &str = "The API key was rejected (401). Check the key in your LLM settings.";
const MSG_PAYMENT: &str = "The LLM account has insufficient balance (402). Top up or switch provider.";
const MSG_MODEL_NOT_FOUND: &str =
    "The model or endpoint was not found (404). Check the base URL and model name.";
const MSG_RATE_LIMITED: &str = "The LLM provider is rate limiting requests (429). Try again in a minute.";
const MSG_SERVER_ERROR: &str = "The LLM provider had an internal error (5xx). Try again later.";
const MSG_NETWORK: &str = "Could not reach the LLM provider. Check your network connection.";
const MSG_TIMEOUT: &str = "The LLM took too long to answer. Try again later.";
const MSG_USER_NOT_FOUND: &str = "No data was found for this user.";
const MSG_NO_CONTENT: &str = "This user has no public content to analyze.";
const MSG_SOURCE_FAILED: &str = "Failed to load the user's content from the platform.";
const MSG_INVALID_RESPONSE: &str = "The LLM returned an unreadable response. Try again.";
const MSG_STORAGE: &str = "Failed to save the analysis result locally.";
const MSG_REQUEST_FAILED: &str = "The analysis failed. Please try again later.";

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("No content for user {0}")]
    NoContent(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

impl AnalyzeError {
    /// Fixed, human-readable message for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalyzeError::Llm(e) => match e {
                LlmError::Http { status, .. } => match status {
                    401 => MSG_UNAUTHORIZED,
                    402 => MSG_PAYMENT,
                    404 => MSG_MODEL_NOT_FOUND,
                    429 => MSG_RATE_LIMITED,
                    500..=599 => MSG_SERVER_ERROR,
                    _ => MSG_REQUEST_FAILED,
                },
                LlmError::Network(_) => MSG_NETWORK,
                LlmError::Timeout(_) => MSG_TIMEOUT,
                LlmError::InvalidResponse(_) => MSG_INVALID_RESPONSE,
                LlmError::Config(_) => MSG_REQUEST_FAILED,
            },
            AnalyzeError::Source(SourceError::NotFound(_)) => MSG_USER_NOT_FOUND,
            AnalyzeError::Source(SourceError::Network(_)) => MSG_NETWORK,
            AnalyzeError::Source(_) => MSG_SOURCE_FAILED,
            AnalyzeError::NoContent(_) => MSG_NO_CONTENT,
            AnalyzeError::History(_) => MSG_STORAGE,
        }
    }
}
