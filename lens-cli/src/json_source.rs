//! [`PlatformSource`] backed by exported JSON files.
//!
//! File layout: `{ "user": UserInfo, "items": [ContentItem, ...] }` (camelCase).
//! `root` is either one file (used for every request) or a directory holding
//! `<platform>/<user_id>.json`.

use std::path::{Path, PathBuf};

use analyzer::{rank_by_relevance, ContentBatch, PlatformSource, SourceError};
use async_trait::async_trait;
use lens_core::{ContentItem, Platform, UserInfo};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct UserExport {
    user: UserInfo,
    #[serde(default)]
    items: Vec<ContentItem>,
}

pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, platform: Platform, user_id: &str) -> PathBuf {
        if self.root.is_dir() {
            self.root
                .join(platform.as_str())
                .join(format!("{}.json", user_id))
        } else {
            self.root.clone()
        }
    }

    async fn load(&self, platform: Platform, user_id: &str) -> Result<UserExport, SourceError> {
        let path = self.path_for(platform, user_id);
        debug!(path = %path.display(), "Reading user export");
        read_export(&path, user_id).await
    }
}

async fn read_export(path: &Path, user_id: &str) -> Result<UserExport, SourceError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceError::NotFound(user_id.to_string()))
        }
        Err(e) => return Err(SourceError::Other(format!("{}: {}", path.display(), e))),
    };
    serde_json::from_str(&raw)
        .map_err(|e| SourceError::Other(format!("{}: invalid export: {}", path.display(), e)))
}

#[async_trait]
impl PlatformSource for JsonFileSource {
    async fn fetch_user_profile(
        &self,
        platform: Platform,
        user_id: &str,
    ) -> Result<UserInfo, SourceError> {
        Ok(self.load(platform, user_id).await?.user)
    }

    async fn fetch_user_content(
        &self,
        platform: Platform,
        user_id: &str,
        limit: usize,
        context: Option<&str>,
    ) -> Result<ContentBatch, SourceError> {
        let export = self.load(platform, user_id).await?;
        Ok(rank_by_relevance(export.items, context, limit))
    }
}
