//! Platform content-fetch seam and the relevance ranking sources share.

use async_trait::async_trait;
use lens_core::{ContentItem, Platform, UserInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// The user (or their content) does not exist on the platform.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

/// Items fetched for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBatch {
    pub items: Vec<ContentItem>,
    /// Items the platform returned before relevance filtering.
    pub total_fetched: usize,
    /// Items that matched the analysis context (all of them when there is no context).
    pub total_relevant: usize,
}

/// Where user metadata and content come from (one implementation per scraping backend).
#[async_trait]
pub trait PlatformSource: Send + Sync {
    async fn fetch_user_profile(
        &self,
        platform: Platform,
        user_id: &str,
    ) -> Result<UserInfo, SourceError>;

    /// At most `limit` items, ranked by relevance to `context` when one is given.
    async fn fetch_user_content(
        &self,
        platform: Platform,
        user_id: &str,
        limit: usize,
        context: Option<&str>,
    ) -> Result<ContentBatch, SourceError>;
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32, 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF)
}

/// Search terms of a context string: lowercase ASCII words of 2+ chars and CJK bigrams.
fn context_terms(context: &str) -> Vec<String> {
    let lower = context.to_lowercase();
    let mut terms: Vec<String> = lower
        .split(|c: char| !c.is_alphanumeric() || is_cjk(c))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_string)
        .collect();

    let cjk: Vec<char> = lower.chars().collect();
    for pair in cjk.windows(2) {
        if is_cjk(pair[0]) && is_cjk(pair[1]) {
            terms.push(pair.iter().collect());
        }
    }
    if terms.is_empty() {
        // single CJK character contexts
        terms.extend(lower.chars().filter(|c| is_cjk(*c)).map(String::from));
    }
    terms.sort();
    terms.dedup();
    terms
}

/// Scores `items` against `context` and keeps the `limit` best.
///
/// Score is the share of context terms found in title + content. Items with a score sort
/// first (stable, so ties keep platform order); non-matching items fill the remaining slots.
/// Without a usable context items are only truncated.
pub fn rank_by_relevance(
    mut items: Vec<ContentItem>,
    context: Option<&str>,
    limit: usize,
) -> ContentBatch {
    let total_fetched = items.len();
    let terms = context.map(context_terms).unwrap_or_default();
    if terms.is_empty() {
        items.truncate(limit);
        return ContentBatch {
            items,
            total_fetched,
            total_relevant: total_fetched,
        };
    }

    for item in items.iter_mut() {
        let haystack = format!(
            "{} {}",
            item.title.as_deref().unwrap_or_default(),
            item.content
        )
        .to_lowercase();
        let hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
        item.relevance = Some(hits as f32 / terms.len() as f32);
    }
    let total_relevant = items
        .iter()
        .filter(|i| i.relevance.unwrap_or(0.0) > 0.0)
        .count();

    items.sort_by(|a, b| {
        let (a, b) = (a.relevance.unwrap_or(0.0), b.relevance.unwrap_or(0.0));
        b.total_cmp(&a)
    });
    items.truncate(limit);

    ContentBatch {
        items,
        total_fetched,
        total_relevant,
    }
}
