//! [`analyzer::ReplyDrafter`]: drafts always fit the platform length policy.

use std::sync::Arc;
use std::time::Duration;

use analyzer::{AnalyzeError, AnalyzerSettings, ReplyDrafter, ReplyRequest};
use lens_core::Platform;
use reply_length::{CountMethod, ReplyLengthPolicy};

mod mock_services;
use mock_services::{MockLlm, Scripted};

fn drafter(llm: Arc<MockLlm>) -> ReplyDrafter {
    ReplyDrafter::new(
        llm,
        ReplyLengthPolicy::new(),
        AnalyzerSettings {
            retry_base_delay: Duration::from_millis(10),
            ..AnalyzerSettings::default()
        },
    )
}

fn request(platform: Platform) -> ReplyRequest {
    ReplyRequest {
        platform,
        thread: "<p>Is Rust worth learning in 2025?</p>".to_string(),
        instruction: Some("agree, mention the borrow checker".to_string()),
    }
}

/// **Test: an over-long Twitter draft is trimmed to the weighted limit.**
#[tokio::test]
async fn test_twitter_draft_is_trimmed() {
    let long = "Rust is worth it. ".repeat(40);
    let llm = Arc::new(MockLlm::replying(&long));

    let draft = drafter(llm.clone()).draft(request(Platform::Twitter)).await.unwrap();

    assert!(draft.length.was_trimmed);
    assert_eq!(draft.length.limit, Some(280));
    assert_eq!(draft.length.count_method, CountMethod::Weighted);
    assert!(draft.length.final_count <= 280);
    assert_eq!(draft.text, draft.length.text);
    assert_eq!(draft.raw, long.trim());
    assert!(llm.last_request()[0].content.contains("under 280 characters"));
    assert!(llm.last_request()[1].content.contains("borrow checker"));
}

/// **Test: platforms without a limit keep the draft unchanged.**
#[tokio::test]
async fn test_unlimited_platform_keeps_draft() {
    let long = "Rust is worth it. ".repeat(40);
    let llm = Arc::new(MockLlm::replying(&long));

    let draft = drafter(llm).draft(request(Platform::Zhihu)).await.unwrap();

    assert!(!draft.length.was_trimmed);
    assert_eq!(draft.length.limit, None);
    assert_eq!(draft.text, long.trim());
}

/// **Test: LLM errors propagate as AnalyzeError with mapped copy.**
#[tokio::test(start_paused = true)]
async fn test_llm_error_propagates() {
    let llm = Arc::new(MockLlm::new(Scripted::Status(402)));

    let err = drafter(llm.clone()).draft(request(Platform::Reddit)).await.unwrap_err();

    assert!(matches!(err, AnalyzeError::Llm(_)));
    assert!(err.user_message().contains("402"));
    assert_eq!(llm.calls(), 1);
}
