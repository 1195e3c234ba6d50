//! # Key-value store
//!
//! The only persistence primitive the history service needs: whole JSON values under string
//! keys. Each call is atomic on its own; read-modify-write sequences are serialised by the
//! caller ([`crate::HistoryService`]).
//!
//! Implementations: [`crate::InMemoryKvStore`] (tests, ephemeral runs) and
//! [`crate::SqliteKvStore`] (durable, one row per key).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns `None` when the key was never set or has been removed.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Inserts or replaces the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
