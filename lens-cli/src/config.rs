use std::env;
use std::str::FromStr;
use std::time::Duration;

use analyzer::AnalyzerSettings;
use anyhow::{Context, Result};

/// persona-lens 配置，从环境变量加载（LLM 相关见 `llm_client::EnvLlmConfig`）
#[derive(Debug, Clone)]
pub struct LensConfig {
    /// SQLite 历史库路径；`:memory:` 表示仅本进程内有效。
    pub history_db_path: String,
    pub log_file: String,
    pub content_limit: usize,
    pub debug_mode: bool,
    pub llm_timeout: Duration,
    pub llm_retries: u32,
    pub llm_retry_base_delay: Duration,
}

/// 读取并解析环境变量；未设置或为空时返回 `default`。
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        _ => Ok(default),
    }
}

impl LensConfig {
    /// 从环境变量加载配置；调用前应先 `dotenvy::dotenv()`。
    pub fn load() -> Result<Self> {
        let defaults = AnalyzerSettings::default();
        let history_db_path =
            env::var("HISTORY_DB_PATH").unwrap_or_else(|_| "./data/history.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/persona-lens.log".to_string());
        let content_limit = env_or("CONTENT_LIMIT", defaults.content_limit)?;
        let debug_mode = env_or("DEBUG_MODE", defaults.debug)?;
        let llm_timeout =
            Duration::from_secs(env_or("LLM_TIMEOUT_SECS", defaults.llm_timeout.as_secs())?);
        let llm_retries = env_or("LLM_RETRIES", defaults.llm_retries)?;
        let llm_retry_base_delay = Duration::from_millis(env_or(
            "LLM_RETRY_BASE_DELAY_MS",
            defaults.retry_base_delay.as_millis() as u64,
        )?);

        if content_limit == 0 {
            anyhow::bail!("CONTENT_LIMIT must be at least 1");
        }

        Ok(Self {
            history_db_path,
            log_file,
            content_limit,
            debug_mode,
            llm_timeout,
            llm_retries,
            llm_retry_base_delay,
        })
    }

    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            content_limit: self.content_limit,
            debug: self.debug_mode,
            llm_timeout: self.llm_timeout,
            llm_retries: self.llm_retries,
            retry_base_delay: self.llm_retry_base_delay,
        }
    }
}
