//! # SQLite KV store
//!
//! Durable [`KvStore`] backed by one table:
//!
//! ```sql
//! CREATE TABLE kv_store (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```
//!
//! Values are stored as JSON text. `":memory:"` / `"sqlite::memory:"` open a private
//! in-memory database on a single connection, so every query sees the same data.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StorageError;
use crate::store::KvStore;

#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

fn is_memory_url(database_url: &str) -> bool {
    matches!(database_url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

impl SqliteKvStore {
    /// Opens (creating if missing) the database at `database_url` and ensures the table exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        info!(database_url = %database_url, "Initializing SQLite KV store");

        let pool = if is_memory_url(database_url) {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?
        } else {
            let options = SqliteConnectOptions::new()
                .create_if_missing(true)
                .filename(database_url);
            SqlitePool::connect_with(options).await?
        };

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some((text,)) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(&value)?;
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
