//! # Profile history
//!
//! Durable cache of generated profiles keyed by (user, platform, macro-category).
//!
//! - [`HistoryService`]: TTL on read, most-recent-first ordering, eviction past `max_users`
//! - [`KvStore`]: storage seam with [`InMemoryKvStore`] and [`SqliteKvStore`]
//! - [`Clock`]: time source, [`ManualClock`] for tests

mod clock;
mod error;
mod inmemory_store;
mod service;
mod sqlite_store;
mod store;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{HistoryError, StorageError};
pub use inmemory_store::InMemoryKvStore;
pub use service::{
    HistoryConfig, HistoryService, ProfileUpdate, CACHE_DURATION, HISTORY_STORAGE_KEY, MAX_USERS,
};
pub use sqlite_store::SqliteKvStore;
pub use store::KvStore;
pub use types::{CategoryProfile, UserHistoryRecord};
