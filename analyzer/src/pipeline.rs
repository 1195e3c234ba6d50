//! Profile analysis pipeline.
//!
//! Classify → cache check → fetch → clean & prompt → generate → persist → respond.
//! Classification and cache failures degrade (general category, cache miss); everything
//! after that aborts the request with an [`AnalyzeError`].

use std::sync::Arc;
use std::time::Instant;

use classifier::resolve_category;
use lens_core::{ContentItem, MacroCategory, Platform, UserInfo};
use llm_client::LlmClient;
use profile_history::{HistoryService, ProfileUpdate};
use prompt::{assemble_profile_prompt, clean_markup, profile_messages};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::AnalyzeError;
use crate::generate::generate;
use crate::parse::parse_profile;
use crate::settings::AnalyzerSettings;
use crate::source::PlatformSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub user_id: String,
    pub platform: Platform,
    /// Free-text analysis context; drives classification and relevance ranking.
    #[serde(default)]
    pub context: Option<String>,
    /// Skip the cache check (the result is still persisted).
    #[serde(default)]
    pub force_refresh: bool,
}

/// Per-step wall time in milliseconds. Steps that did not run stay 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub classify_ms: u64,
    pub cache_ms: u64,
    pub fetch_ms: u64,
    pub prompt_ms: u64,
    pub llm_ms: u64,
    pub persist_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub prompt: String,
    pub raw_output: String,
    pub total_fetched: usize,
    pub total_relevant: usize,
    pub items_used: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub profile: Value,
    pub category: MacroCategory,
    pub model: String,
    /// Items the profile was generated from; empty on cache hits.
    pub items: Vec<ContentItem>,
    pub user_info: Option<UserInfo>,
    pub from_cache: bool,
    /// Generation time (epoch-ms) of the cached profile; `None` for fresh results.
    pub cached_at: Option<i64>,
    pub debug: Option<DebugInfo>,
    pub metrics: Timing,
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// Runs analyze requests against injected collaborators.
pub struct ProfileAnalyzer {
    llm: Arc<dyn LlmClient>,
    source: Arc<dyn PlatformSource>,
    history: Arc<HistoryService>,
    settings: AnalyzerSettings,
}

impl ProfileAnalyzer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        source: Arc<dyn PlatformSource>,
        history: Arc<HistoryService>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            llm,
            source,
            history,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, platform = %request.platform))]
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        let started = Instant::now();
        let mut metrics = Timing::default();
        let context = request
            .context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        // 1. classify
        let step = Instant::now();
        let category = match context {
            Some(ctx) => resolve_category(self.llm.as_ref(), ctx, self.settings.llm_timeout).await,
            None => MacroCategory::General,
        };
        metrics.classify_ms = elapsed_ms(step);
        info!(category = %category, "step: classified");

        // 2. cache check
        if !request.force_refresh {
            let step = Instant::now();
            let cached = match self
                .history
                .get_profile(&request.user_id, request.platform, category.id())
                .await
            {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(error = %e, "cache read failed, treating as miss");
                    None
                }
            };
            metrics.cache_ms = elapsed_ms(step);
            if let Some(profile) = cached {
                let user_info = self
                    .history
                    .get_user_record(&request.user_id, request.platform)
                    .await
                    .ok()
                    .flatten()
                    .and_then(|r| r.user_info);
                metrics.total_ms = elapsed_ms(started);
                info!(category = %category, "step: cache hit");
                return Ok(AnalyzeResponse {
                    profile: profile.profile_data,
                    category,
                    model: profile.model,
                    items: Vec::new(),
                    user_info,
                    from_cache: true,
                    cached_at: Some(profile.timestamp),
                    debug: None,
                    metrics,
                });
            }
        }

        // 3. fetch
        let step = Instant::now();
        let user_info = self
            .source
            .fetch_user_profile(request.platform, &request.user_id)
            .await?;
        let batch = self
            .source
            .fetch_user_content(
                request.platform,
                &request.user_id,
                self.settings.content_limit,
                context,
            )
            .await?;
        metrics.fetch_ms = elapsed_ms(step);
        info!(
            total_fetched = batch.total_fetched,
            total_relevant = batch.total_relevant,
            items = batch.items.len(),
            "step: content fetched"
        );
        // markup-only items are dropped by the prompt builder too
        if batch
            .items
            .iter()
            .all(|i| clean_markup(&i.content).trim().is_empty())
        {
            return Err(AnalyzeError::NoContent(request.user_id));
        }

        // 4. clean & prompt
        let step = Instant::now();
        let prompt_text =
            assemble_profile_prompt(request.platform, Some(&user_info), context, &batch.items);
        let messages = profile_messages(&prompt_text, category);
        metrics.prompt_ms = elapsed_ms(step);

        // 5. generate
        let step = Instant::now();
        let generation = generate(self.llm.as_ref(), messages, &self.settings).await?;
        metrics.llm_ms = elapsed_ms(step);
        info!(
            model = %generation.model,
            duration_ms = generation.duration_ms,
            "step: profile generated"
        );
        let profile = parse_profile(&generation.content);

        // 6. persist, keyed by category rather than raw context
        let step = Instant::now();
        self.history
            .save_profile(
                &request.user_id,
                request.platform,
                ProfileUpdate {
                    category: category.id().to_string(),
                    profile_data: profile.clone(),
                    context: context.unwrap_or_default().to_string(),
                    model: generation.model.clone(),
                },
                Some(user_info.clone()),
            )
            .await?;
        metrics.persist_ms = elapsed_ms(step);

        // 7. respond
        metrics.total_ms = elapsed_ms(started);
        let debug = self.settings.debug.then(|| DebugInfo {
            prompt: prompt_text,
            raw_output: generation.content.clone(),
            total_fetched: batch.total_fetched,
            total_relevant: batch.total_relevant,
            items_used: batch.items.len(),
        });
        info!(total_ms = metrics.total_ms, "step: analysis done");

        Ok(AnalyzeResponse {
            profile,
            category,
            model: generation.model,
            items: batch.items,
            user_info: Some(user_info),
            from_cache: false,
            cached_at: None,
            debug,
            metrics,
        })
    }
}
