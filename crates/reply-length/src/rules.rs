//! Per-platform length rules, kept in one table so every rule is testable in isolation.

use lens_core::Platform;
use serde::{Deserialize, Serialize};

/// Maximum weighted length of a Twitter/X post.
pub const TWITTER_MAX_WEIGHTED_LENGTH: usize = 280;

/// How a platform counts the length of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMethod {
    /// URLs and wide glyphs count with fixed weights.
    Weighted,
    /// Unicode code points.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRules {
    /// `None` means the platform has no reply limit.
    pub limit: Option<usize>,
    pub count_method: CountMethod,
}

const PLATFORM_RULES: [(Platform, PlatformRules); 4] = [
    (
        Platform::Zhihu,
        PlatformRules {
            limit: None,
            count_method: CountMethod::Plain,
        },
    ),
    (
        Platform::Reddit,
        PlatformRules {
            limit: None,
            count_method: CountMethod::Plain,
        },
    ),
    (
        Platform::Twitter,
        PlatformRules {
            limit: Some(TWITTER_MAX_WEIGHTED_LENGTH),
            count_method: CountMethod::Weighted,
        },
    ),
    (
        Platform::Quora,
        PlatformRules {
            limit: None,
            count_method: CountMethod::Plain,
        },
    ),
];

const UNLIMITED: PlatformRules = PlatformRules {
    limit: None,
    count_method: CountMethod::Plain,
};

/// Returns the rules for `platform`.
pub fn rules_for(platform: Platform) -> &'static PlatformRules {
    PLATFORM_RULES
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, rules)| rules)
        .unwrap_or(&UNLIMITED)
}
