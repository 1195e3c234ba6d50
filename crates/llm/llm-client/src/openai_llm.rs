//! OpenAI 兼容实现的 LlmClient：POST {base_url}/chat/completions，保留 HTTP 状态码。

use std::time::Instant;

use async_trait::async_trait;
use prompt::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::LlmConfig;
use crate::{mask_token, Generation, LlmClient, LlmError, TokenUsage};

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// 基于 reqwest 的 LlmClient 实现，适用于所有 OpenAI 兼容服务。
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: None,
        }
    }

    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::new(config.api_key(), config.base_url())
            .with_model(config.model())
            .with_temperature(config.temperature())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Requested model; responses without a `model` field report this one.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// 从错误响应体中取 `error.message`，取不到则用原始 body。
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Generation, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| RequestMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.temperature,
        };

        debug!(
            url = %self.endpoint(),
            api_key = %mask_token(&self.api_key),
            message_count = messages.len(),
            "step: LLM request"
        );
        let started = Instant::now();

        let mut builder = self.http.post(self.endpoint()).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), error = %message, "LLM request failed");
            return Err(LlmError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("malformed body: {}", e)))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?;

        debug!(duration_ms, content_len = content.len(), "step: LLM response received");

        Ok(Generation {
            content,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            duration_ms,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}
