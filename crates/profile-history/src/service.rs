//! # HistoryService
//!
//! Per-(user, platform, category) profile cache on top of a [`KvStore`].
//!
//! The whole collection lives under one key as a JSON array, most recently touched record
//! first. Writes move the record to the front and truncate to `max_users`; reads hide
//! profiles older than `cache_duration` but never delete them.
//!
//! Every operation holds `write_lock`, so concurrent `save_profile` calls on one service
//! cannot lose each other's updates. Two services over the same store are not coordinated.

use std::sync::Arc;
use std::time::Duration;

use lens_core::{Platform, UserInfo};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::HistoryError;
use crate::store::KvStore;
use crate::types::{CategoryProfile, UserHistoryRecord};

pub const MAX_USERS: usize = 200;
pub const CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
pub const HISTORY_STORAGE_KEY: &str = "persona_lens_history";

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub max_users: usize,
    pub cache_duration: Duration,
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_users: MAX_USERS,
            cache_duration: CACHE_DURATION,
            storage_key: HISTORY_STORAGE_KEY.to_string(),
        }
    }
}

/// Data of one freshly generated profile.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub category: String,
    pub profile_data: Value,
    pub context: String,
    pub model: String,
}

pub struct HistoryService {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    config: HistoryConfig,
    write_lock: Mutex<()>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_config(store, Arc::new(SystemClock), HistoryConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        config: HistoryConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the collection. A missing or undecodable blob is an empty history.
    async fn load(&self) -> Result<Vec<UserHistoryRecord>, HistoryError> {
        let Some(value) = self.store.get(&self.config.storage_key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_value(value) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(error = %e, key = %self.config.storage_key, "Stored history is unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, records: &[UserHistoryRecord]) -> Result<(), HistoryError> {
        let value =
            serde_json::to_value(records).map_err(|e| HistoryError::Encode(e.to_string()))?;
        self.store.set(&self.config.storage_key, value).await?;
        Ok(())
    }

    /// Upserts one category profile and moves the record to the front.
    ///
    /// `user_info` replaces the stored snapshot when given; `None` keeps the previous one.
    #[instrument(skip(self, update, user_info), fields(category = %update.category))]
    pub async fn save_profile(
        &self,
        user_id: &str,
        platform: Platform,
        update: ProfileUpdate,
        user_info: Option<UserInfo>,
    ) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now_ms();
        let mut records = self.load().await?;

        let mut record = match records.iter().position(|r| r.matches(user_id, platform)) {
            Some(index) => records.remove(index),
            None => UserHistoryRecord::new(user_id, platform),
        };
        record.profiles.insert(
            update.category.clone(),
            CategoryProfile {
                category: update.category,
                profile_data: update.profile_data,
                context: update.context,
                timestamp: now,
                model: update.model,
            },
        );
        record.last_updated = now;
        if user_info.is_some() {
            record.user_info = user_info;
        }

        records.insert(0, record);
        if records.len() > self.config.max_users {
            let evicted = records.len() - self.config.max_users;
            records.truncate(self.config.max_users);
            info!(evicted, max_users = self.config.max_users, "Evicted least recent users");
        }

        self.persist(&records).await?;
        debug!(records = records.len(), "step: profile saved");
        Ok(())
    }

    /// Cached profile, or `None` when absent or older than `cache_duration`.
    ///
    /// A profile exactly `cache_duration` old is still returned.
    pub async fn get_profile(
        &self,
        user_id: &str,
        platform: Platform,
        category: &str,
    ) -> Result<Option<CategoryProfile>, HistoryError> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now_ms();

        let profile = self
            .load()
            .await?
            .into_iter()
            .find(|r| r.matches(user_id, platform))
            .and_then(|mut r| r.profiles.remove(category));

        Ok(profile.filter(|p| {
            let fresh = self.is_fresh_at(p, now);
            if !fresh {
                debug!(category, age_ms = now - p.timestamp, "Cached profile expired");
            }
            fresh
        }))
    }

    /// Whether `profile` would still be served by [`Self::get_profile`] right now.
    pub fn is_fresh(&self, profile: &CategoryProfile) -> bool {
        self.is_fresh_at(profile, self.clock.now_ms())
    }

    fn is_fresh_at(&self, profile: &CategoryProfile, now: i64) -> bool {
        now - profile.timestamp <= self.config.cache_duration.as_millis() as i64
    }

    pub async fn get_user_record(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<UserHistoryRecord>, HistoryError> {
        let _guard = self.write_lock.lock().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|r| r.matches(user_id, platform)))
    }

    /// All records, most recently touched first.
    pub async fn get_all_user_records(&self) -> Result<Vec<UserHistoryRecord>, HistoryError> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    /// Removes one category; a record left without profiles is removed too.
    pub async fn delete_profile(
        &self,
        user_id: &str,
        platform: Platform,
        category: &str,
    ) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let Some(index) = records.iter().position(|r| r.matches(user_id, platform)) else {
            return Ok(());
        };
        if records[index].profiles.remove(category).is_none() {
            return Ok(());
        }
        if records[index].profiles.is_empty() {
            records.remove(index);
        }
        self.persist(&records).await
    }

    pub async fn delete_user_record(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| !r.matches(user_id, platform));
        if records.len() == before {
            return Ok(());
        }
        self.persist(&records).await
    }

    pub async fn clear_all(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(&self.config.storage_key).await?;
        info!("History cleared");
        Ok(())
    }
}
