//! In-memory [`KvStore`]: data is lost on restart. Thread-safe via `Arc<RwLock<>>`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::KvStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKvStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", json!({"a": 1})).await.unwrap();
        store.set("k", json!({"a": 2})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 2})));
        assert_eq!(store.len().await, 1);

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryKvStore::new();
        let other = store.clone();
        store.set("shared", json!(true)).await.unwrap();
        assert_eq!(other.get("shared").await.unwrap(), Some(json!(true)));
    }
}
