//! LLM call errors.

use llm_retry::TimeoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request never got a response (DNS, connect, TLS, reset).
    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Timeouts, transport failures, 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Timeout(_) | LlmError::Network(_) => true,
            LlmError::Http { status, .. } => *status == 429 || *status >= 500,
            LlmError::InvalidResponse(_) | LlmError::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            LlmError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            LlmError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_retryable_classification() {
        let http = |status| LlmError::Http {
            status,
            message: String::new(),
        };
        assert!(http(429).is_retryable());
        assert!(http(500).is_retryable());
        assert!(http(503).is_retryable());
        assert!(!http(401).is_retryable());
        assert!(!http(402).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(LlmError::Network("reset".into()).is_retryable());
        assert!(LlmError::from(TimeoutError {
            after: Duration::from_secs(1)
        })
        .is_retryable());
        assert!(!LlmError::InvalidResponse("no choices".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message_is_kept() {
        let e = LlmError::from(TimeoutError {
            after: Duration::from_secs(1),
        });
        assert_eq!(e.to_string(), "LLM request timeout");
        assert_eq!(e.status(), None);
    }
}
