use std::time::Duration;

/// Tunables of one analyzer instance.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Max content items fetched per analysis.
    pub content_limit: usize,
    /// Attach prompt and raw LLM output to responses.
    pub debug: bool,
    pub llm_timeout: Duration,
    /// Retries after the first LLM attempt.
    pub llm_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            content_limit: 15,
            debug: false,
            llm_timeout: Duration::from_secs(60),
            llm_retries: 2,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}
