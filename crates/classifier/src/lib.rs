//! # Classifier
//!
//! Maps free text (the analysis context) to a [`MacroCategory`]. Keyword tables answer
//! first; the LLM is only asked when no keyword matches. Profiles are cached per category,
//! so a stable answer matters more than a precise one.

mod keywords;

use std::time::Duration;

use lens_core::MacroCategory;
use llm_client::{LlmClient, LlmError};
use llm_retry::with_timeout;
use prompt::classification_messages;
use tracing::{debug, info, instrument, warn};

use keywords::{find_keyword, keyword_hits};

/// Keyword classification. Highest hit count wins; ties go to the earlier table entry;
/// no hits gives [`MacroCategory::General`].
pub fn classify(text: &str) -> MacroCategory {
    let mut best = (MacroCategory::General, 0usize);
    for (category, hits) in keyword_hits(text) {
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}

/// Parses the earliest known category id in an LLM answer.
fn parse_category_answer(answer: &str) -> MacroCategory {
    let lower = answer.to_lowercase();
    MacroCategory::ALL
        .iter()
        .filter_map(|c| find_keyword(&lower, c.id()).map(|start| (start, *c)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, c)| c)
        .unwrap_or_default()
}

/// Asks the LLM for a category id. Unknown answers map to [`MacroCategory::General`].
pub async fn classify_with_llm(
    llm: &dyn LlmClient,
    text: &str,
) -> Result<MacroCategory, LlmError> {
    let generation = llm.complete(classification_messages(text)).await?;
    let category = parse_category_answer(&generation.content);
    debug!(answer = %generation.content.trim(), category = %category, "LLM classification");
    Ok(category)
}

/// Keyword first, LLM fallback bounded by `timeout`. Never fails: any LLM error,
/// including the timeout, degrades to `General`.
#[instrument(skip(llm, text), fields(text_len = text.len()))]
pub async fn resolve_category(
    llm: &dyn LlmClient,
    text: &str,
    timeout: Duration,
) -> MacroCategory {
    if text.trim().is_empty() {
        return MacroCategory::General;
    }
    let by_keyword = classify(text);
    if !by_keyword.is_general() {
        info!(category = %by_keyword, "step: category from keywords");
        return by_keyword;
    }
    let answer = with_timeout(classify_with_llm(llm, text), timeout)
        .await
        .map_err(LlmError::from)
        .and_then(|r| r);
    match answer {
        Ok(category) => {
            info!(category = %category, "step: category from LLM");
            category
        }
        Err(e) => {
            warn!(error = %e, "LLM classification failed, using general");
            MacroCategory::General
        }
    }
}
