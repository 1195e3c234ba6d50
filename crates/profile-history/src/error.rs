//! Storage and history error types.
//!
//! Mechanical errors only; user-facing copy is produced by the analyzer.

use thiserror::Error;

/// Errors from a [`crate::KvStore`] backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Errors from [`crate::HistoryService`].
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to encode history: {0}")]
    Encode(String),
}
