//! Stored history types. Serialised camelCase; the whole collection is one JSON array.

use std::collections::BTreeMap;

use lens_core::{Platform, UserInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One generated profile for one macro-category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfile {
    pub category: String,
    /// Opaque LLM output (usually an object with `summary`, `value_orientation`, ...).
    pub profile_data: Value,
    /// Analysis context the profile was generated for.
    #[serde(default)]
    pub context: String,
    /// Epoch-ms of the latest successful generation.
    pub timestamp: i64,
    #[serde(default)]
    pub model: String,
}

/// All cached profiles of one user on one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHistoryRecord {
    pub user_id: String,
    pub platform: Platform,
    #[serde(default)]
    pub profiles: BTreeMap<String, CategoryProfile>,
    pub last_updated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl UserHistoryRecord {
    pub fn new(user_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            user_id: user_id.into(),
            platform,
            profiles: BTreeMap::new(),
            last_updated: 0,
            user_info: None,
        }
    }

    pub fn matches(&self, user_id: &str, platform: Platform) -> bool {
        self.user_id == user_id && self.platform == platform
    }
}
