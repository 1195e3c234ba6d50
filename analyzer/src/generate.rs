//! One LLM generation wrapped in timeout + retry.

use llm_client::{Generation, LlmClient, LlmError};
use llm_retry::{with_retry, with_timeout, RetryOptions};
use prompt::ChatMessage;

use crate::settings::AnalyzerSettings;

/// Every attempt gets its own `llm_timeout`; only retryable errors are retried.
pub(crate) async fn generate(
    llm: &dyn LlmClient,
    messages: Vec<ChatMessage>,
    settings: &AnalyzerSettings,
) -> Result<Generation, LlmError> {
    let options = RetryOptions {
        retries: settings.llm_retries,
        base_delay: settings.retry_base_delay,
        should_retry: |e: &LlmError| e.is_retryable(),
    };
    with_retry(
        |_attempt| {
            let messages = messages.clone();
            async move { with_timeout(llm.complete(messages), settings.llm_timeout).await? }
        },
        options,
    )
    .await
}
