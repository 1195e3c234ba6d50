//! Core types: platform, macro-category, user snapshot and fetched content items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Supported social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Zhihu,
    Reddit,
    Twitter,
    Quora,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Zhihu,
        Platform::Reddit,
        Platform::Twitter,
        Platform::Quora,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Zhihu => "zhihu",
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::Quora => "quora",
        }
    }

    /// Human-readable name used in prompts and CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Zhihu => "Zhihu",
            Platform::Reddit => "Reddit",
            Platform::Twitter => "Twitter/X",
            Platform::Quora => "Quora",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    /// Accepts the lowercase id plus `x` as an alias for Twitter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zhihu" => Ok(Platform::Zhihu),
            "reddit" => Ok(Platform::Reddit),
            "twitter" | "x" => Ok(Platform::Twitter),
            "quora" => Ok(Platform::Quora),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Coarse topic bucket assigned to free-text context; the cache partition key.
///
/// `General` is the default bucket: keyword classification falls back to it and
/// it triggers the LLM classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroCategory {
    #[default]
    General,
    Politics,
    Economy,
    Society,
    Technology,
    Culture,
    Entertainment,
    Lifestyle,
}

impl MacroCategory {
    pub const ALL: [MacroCategory; 8] = [
        MacroCategory::General,
        MacroCategory::Politics,
        MacroCategory::Economy,
        MacroCategory::Society,
        MacroCategory::Technology,
        MacroCategory::Culture,
        MacroCategory::Entertainment,
        MacroCategory::Lifestyle,
    ];

    /// Stable id stored in history records.
    pub fn id(&self) -> &'static str {
        match self {
            MacroCategory::General => "general",
            MacroCategory::Politics => "politics",
            MacroCategory::Economy => "economy",
            MacroCategory::Society => "society",
            MacroCategory::Technology => "technology",
            MacroCategory::Culture => "culture",
            MacroCategory::Entertainment => "entertainment",
            MacroCategory::Lifestyle => "lifestyle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MacroCategory::General => "General",
            MacroCategory::Politics => "Politics & Public Affairs",
            MacroCategory::Economy => "Economy & Finance",
            MacroCategory::Society => "Society & Social Issues",
            MacroCategory::Technology => "Science & Technology",
            MacroCategory::Culture => "Culture, History & Philosophy",
            MacroCategory::Entertainment => "Entertainment & Gaming",
            MacroCategory::Lifestyle => "Lifestyle & Relationships",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, MacroCategory::General)
    }
}

impl fmt::Display for MacroCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MacroCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        MacroCategory::ALL
            .into_iter()
            .find(|c| c.id() == needle)
            .ok_or(CoreError::UnknownCategory(needle))
    }
}

/// Snapshot of the analysed user's public profile, cached alongside results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Kind of a fetched content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Answer,
    Article,
    #[default]
    Post,
    Comment,
    Tweet,
    Question,
}

/// A single piece of user content. `content` may still contain markup; the prompt layer cleans it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Relevance to the analysis context, filled in by sources that rank items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_and_display() {
        assert_eq!("zhihu".parse::<Platform>().unwrap(), Platform::Zhihu);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!(Platform::Quora.to_string(), "quora");
        assert!(matches!(
            "weibo".parse::<Platform>(),
            Err(CoreError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Reddit).unwrap();
        assert_eq!(json, "\"reddit\"");
        let parsed: Platform = serde_json::from_str("\"twitter\"").unwrap();
        assert_eq!(parsed, Platform::Twitter);
    }

    #[test]
    fn test_category_ids_round_trip_through_from_str() {
        for c in MacroCategory::ALL {
            assert_eq!(c.id().parse::<MacroCategory>().unwrap(), c);
        }
        assert!("sports".parse::<MacroCategory>().is_err());
        assert!(MacroCategory::default().is_general());
    }

    #[test]
    fn test_content_item_camel_case_defaults() {
        let item: ContentItem =
            serde_json::from_str(r#"{"id":"1","content":"hi","createdAt":5}"#).unwrap();
        assert_eq!(item.kind, ContentKind::Post);
        assert_eq!(item.created_at, Some(5));
        assert!(item.title.is_none());
    }
}
