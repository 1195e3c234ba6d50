//! [`ReplyLengthPolicy`]: platform-aware counting and limit enforcement.

use std::sync::Arc;

use lens_core::Platform;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::rules::{rules_for, CountMethod};
use crate::weighted::{TwitterTextCounter, WeightedCounter};

/// Length of `text` in Unicode code points.
pub fn plain_count(text: &str) -> usize {
    text.chars().count()
}

/// Count of a text under a platform's rules, with the method that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCount {
    pub count: usize,
    pub method: CountMethod,
}

/// Outcome of [`ReplyLengthPolicy::apply_limit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyLengthPolicyResult {
    pub text: String,
    pub was_trimmed: bool,
    /// `None` when the platform has no limit.
    pub limit: Option<usize>,
    pub count_method: CountMethod,
    pub original_count: usize,
    pub final_count: usize,
}

/// Reply length policy service.
///
/// Holds the weighted counter used for platforms whose rules are [`CountMethod::Weighted`].
/// Without a counter (or when it fails) every platform is counted in code points.
#[derive(Clone)]
pub struct ReplyLengthPolicy {
    counter: Option<Arc<dyn WeightedCounter>>,
}

impl ReplyLengthPolicy {
    /// Policy with the built-in Twitter counter; degrades to plain counting if it cannot be built.
    pub fn new() -> Self {
        match TwitterTextCounter::new() {
            Ok(counter) => Self::with_counter(Arc::new(counter)),
            Err(e) => {
                warn!(error = %e, "weighted counter unavailable, using plain counting");
                Self::plain_only()
            }
        }
    }

    pub fn with_counter(counter: Arc<dyn WeightedCounter>) -> Self {
        Self {
            counter: Some(counter),
        }
    }

    pub fn plain_only() -> Self {
        Self { counter: None }
    }

    pub fn platform_limit(&self, platform: Platform) -> Option<usize> {
        rules_for(platform).limit
    }

    pub fn count_for_platform(&self, text: &str, platform: Platform) -> PlatformCount {
        if rules_for(platform).count_method == CountMethod::Weighted {
            if let Some(counter) = &self.counter {
                match counter.weighted_length(text) {
                    Ok(count) => {
                        return PlatformCount {
                            count,
                            method: CountMethod::Weighted,
                        }
                    }
                    Err(e) => {
                        warn!(
                            platform = %platform,
                            error = %e,
                            "weighted count failed, falling back to code points"
                        );
                    }
                }
            }
        }
        PlatformCount {
            count: plain_count(text),
            method: CountMethod::Plain,
        }
    }

    /// Returns `text` unchanged when it fits (or the platform has no limit), otherwise the
    /// longest code-point prefix that fits.
    pub fn apply_limit(&self, text: &str, platform: Platform) -> ReplyLengthPolicyResult {
        let original = self.count_for_platform(text, platform);
        let limit = self.platform_limit(platform);

        match limit {
            Some(max) if original.count > max => {
                let trimmed = self.trim_to_limit(text, platform, max);
                let final_count = self.count_for_platform(&trimmed, platform);
                debug!(
                    platform = %platform,
                    limit = max,
                    original_count = original.count,
                    final_count = final_count.count,
                    "reply trimmed to platform limit"
                );
                ReplyLengthPolicyResult {
                    text: trimmed,
                    was_trimmed: true,
                    limit,
                    count_method: original.method,
                    original_count: original.count,
                    final_count: final_count.count,
                }
            }
            _ => ReplyLengthPolicyResult {
                text: text.to_string(),
                was_trimmed: false,
                limit,
                count_method: original.method,
                original_count: original.count,
                final_count: original.count,
            },
        }
    }

    /// Binary search over code-point prefixes for the longest one whose count is `<= limit`.
    ///
    /// Only prefixes that were counted and fit are ever kept, so the result satisfies the
    /// limit even if the weighted count is not monotonic in prefix length (URL boundaries).
    /// Maximality does rely on monotonicity.
    pub fn trim_to_limit(&self, text: &str, platform: Platform, limit: usize) -> String {
        // boundaries[k] is the byte offset just past the first k code points.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut low = 0;
        let mut high = boundaries.len() - 1;
        while low < high {
            let mid = low + (high - low + 1) / 2;
            let prefix = &text[..boundaries[mid]];
            if self.count_for_platform(prefix, platform).count <= limit {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        text[..boundaries[low]].to_string()
    }
}

impl Default for ReplyLengthPolicy {
    fn default() -> Self {
        Self::new()
    }
}
