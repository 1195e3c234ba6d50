//! LLM configuration: provider table, trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Supported providers. All of them expose an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    OpenAi,
    DeepSeek,
    Qwen,
    Gemini,
    Ollama,
    /// Any other compatible endpoint; requires an explicit base URL.
    Custom,
}

struct ProviderSpec {
    provider: LlmProvider,
    id: &'static str,
    base_url: &'static str,
    default_model: &'static str,
    requires_api_key: bool,
}

const PROVIDERS: [ProviderSpec; 6] = [
    ProviderSpec {
        provider: LlmProvider::OpenAi,
        id: "openai",
        base_url: "https://api.openai.com/v1",
        default_model: "gpt-4o-mini",
        requires_api_key: true,
    },
    ProviderSpec {
        provider: LlmProvider::DeepSeek,
        id: "deepseek",
        base_url: "https://api.deepseek.com/v1",
        default_model: "deepseek-chat",
        requires_api_key: true,
    },
    ProviderSpec {
        provider: LlmProvider::Qwen,
        id: "qwen",
        base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        default_model: "qwen-plus",
        requires_api_key: true,
    },
    ProviderSpec {
        provider: LlmProvider::Gemini,
        id: "gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        default_model: "gemini-2.0-flash",
        requires_api_key: true,
    },
    ProviderSpec {
        provider: LlmProvider::Ollama,
        id: "ollama",
        base_url: "http://localhost:11434/v1",
        default_model: "llama3.1",
        requires_api_key: false,
    },
    ProviderSpec {
        provider: LlmProvider::Custom,
        id: "custom",
        base_url: "",
        default_model: "",
        requires_api_key: false,
    },
];

impl LlmProvider {
    fn spec(&self) -> &'static ProviderSpec {
        PROVIDERS
            .iter()
            .find(|s| s.provider == *self)
            .unwrap_or(&PROVIDERS[PROVIDERS.len() - 1])
    }

    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    /// Default base URL; empty for [`LlmProvider::Custom`].
    pub fn default_base_url(&self) -> &'static str {
        self.spec().base_url
    }

    pub fn default_model(&self) -> &'static str {
        self.spec().default_model
    }

    pub fn requires_api_key(&self) -> bool {
        self.spec().requires_api_key
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        PROVIDERS
            .iter()
            .find(|spec| spec.id == needle)
            .map(|spec| spec.provider)
            .with_context(|| format!("unknown LLM provider: {}", s))
    }
}

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn provider(&self) -> LlmProvider;
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> Option<f32>;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: Option<f32>,
}

impl LlmConfig for EnvLlmConfig {
    fn provider(&self) -> LlmProvider {
        self.llm_provider
    }
    fn api_key(&self) -> &str {
        &self.llm_api_key
    }
    fn base_url(&self) -> &str {
        &self.llm_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn temperature(&self) -> Option<f32> {
        self.llm_temperature
    }
}

impl EnvLlmConfig {
    /// Load from environment variables.
    ///
    /// `LLM_PROVIDER` (default `openai`), `LLM_API_KEY` or `OPENAI_API_KEY`, `LLM_BASE_URL`,
    /// `LLM_MODEL`, `LLM_TEMPERATURE`. Unset URL / model fall back to the provider table.
    pub fn from_env() -> Result<Self> {
        let llm_provider: LlmProvider = env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse()?;
        let llm_api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();
        if llm_provider.requires_api_key() && llm_api_key.trim().is_empty() {
            anyhow::bail!(
                "LLM_API_KEY (or OPENAI_API_KEY) is required for provider {}",
                llm_provider
            );
        }
        let llm_base_url = env::var("LLM_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| llm_provider.default_base_url().to_string());
        if llm_base_url.is_empty() {
            anyhow::bail!("LLM_BASE_URL is required for provider {}", llm_provider);
        }
        let llm_model = env::var("LLM_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| llm_provider.default_model().to_string());
        if llm_model.is_empty() {
            anyhow::bail!("LLM_MODEL is required for provider {}", llm_provider);
        }
        let llm_temperature = env::var("LLM_TEMPERATURE")
            .ok()
            .map(|s| s.parse::<f32>())
            .transpose()
            .context("LLM_TEMPERATURE must be a number")?;
        Ok(Self {
            llm_provider,
            llm_api_key,
            llm_base_url,
            llm_model,
            llm_temperature,
        })
    }
}
