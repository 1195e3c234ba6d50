//! Reply drafting: LLM draft, then the platform length policy.

use std::sync::Arc;

use lens_core::Platform;
use llm_client::LlmClient;
use prompt::reply_messages;
use reply_length::{ReplyLengthPolicy, ReplyLengthPolicyResult};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::AnalyzeError;
use crate::generate::generate;
use crate::settings::AnalyzerSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub platform: Platform,
    /// Text being replied to (may contain markup).
    pub thread: String,
    #[serde(default)]
    pub instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDraft {
    /// Final reply, within the platform limit.
    pub text: String,
    /// Model output before trimming.
    pub raw: String,
    pub model: String,
    pub length: ReplyLengthPolicyResult,
}

pub struct ReplyDrafter {
    llm: Arc<dyn LlmClient>,
    policy: ReplyLengthPolicy,
    settings: AnalyzerSettings,
}

impl ReplyDrafter {
    pub fn new(llm: Arc<dyn LlmClient>, policy: ReplyLengthPolicy, settings: AnalyzerSettings) -> Self {
        Self {
            llm,
            policy,
            settings,
        }
    }

    #[instrument(skip(self, request), fields(platform = %request.platform))]
    pub async fn draft(&self, request: ReplyRequest) -> Result<ReplyDraft, AnalyzeError> {
        let limit = self.policy.platform_limit(request.platform);
        let messages = reply_messages(
            request.platform,
            &request.thread,
            request.instruction.as_deref(),
            limit,
        );

        let generation = generate(self.llm.as_ref(), messages, &self.settings).await?;
        let raw = generation.content.trim().to_string();
        let length = self.policy.apply_limit(&raw, request.platform);
        info!(
            was_trimmed = length.was_trimmed,
            original_count = length.original_count,
            final_count = length.final_count,
            "step: reply drafted"
        );

        Ok(ReplyDraft {
            text: length.text.clone(),
            raw,
            model: generation.model,
            length,
        })
    }
}
