//! Scripted LLM client and in-memory platform source shared by analyzer tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use analyzer::{rank_by_relevance, ContentBatch, PlatformSource, SourceError};
use async_trait::async_trait;
use lens_core::{ContentItem, ContentKind, Platform, UserInfo};
use llm_client::{Generation, LlmClient, LlmError};
use prompt::ChatMessage;

#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Status(u16),
    /// Never answers within any sane timeout.
    Hang,
}

/// Pops one scripted answer per call; falls back to `default` when the script is empty.
pub struct MockLlm {
    script: Mutex<VecDeque<Scripted>>,
    default: Scripted,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn new(default: Scripted) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Scripted::Reply(text.to_string()))
    }

    pub fn then(self, next: Scripted) -> Self {
        self.script.lock().unwrap().push_back(next);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Generation, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        match next {
            Scripted::Reply(content) => Ok(Generation {
                content,
                model: "mock-model".to_string(),
                duration_ms: 5,
                usage: None,
            }),
            Scripted::Status(status) => Err(LlmError::Http {
                status,
                message: format!("status {}", status),
            }),
            Scripted::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::Network("unreachable".to_string()))
            }
        }
    }
}

/// Users keyed by (platform, id).
#[derive(Default)]
pub struct MockSource {
    users: HashMap<(Platform, String), (UserInfo, Vec<ContentItem>)>,
    pub fetches: AtomicUsize,
}

impl MockSource {
    pub fn with_user(mut self, platform: Platform, user_id: &str, contents: &[&str]) -> Self {
        let info = UserInfo {
            name: format!("{} name", user_id),
            headline: Some("Tester".to_string()),
            ..UserInfo::default()
        };
        let items = contents
            .iter()
            .enumerate()
            .map(|(i, c)| ContentItem {
                id: format!("{}-{}", user_id, i),
                kind: ContentKind::Answer,
                content: c.to_string(),
                ..ContentItem::default()
            })
            .collect();
        self.users.insert((platform, user_id.to_string()), (info, items));
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformSource for MockSource {
    async fn fetch_user_profile(
        &self,
        platform: Platform,
        user_id: &str,
    ) -> Result<UserInfo, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(&(platform, user_id.to_string()))
            .map(|(info, _)| info.clone())
            .ok_or_else(|| SourceError::NotFound(user_id.to_string()))
    }

    async fn fetch_user_content(
        &self,
        platform: Platform,
        user_id: &str,
        limit: usize,
        context: Option<&str>,
    ) -> Result<ContentBatch, SourceError> {
        let (_, items) = self
            .users
            .get(&(platform, user_id.to_string()))
            .ok_or_else(|| SourceError::NotFound(user_id.to_string()))?;
        Ok(rank_by_relevance(items.clone(), context, limit))
    }
}
