//! # Reply length policy
//!
//! Enforces each platform's maximum reply length using that platform's own counting
//! semantics, and trims over-long drafts to the longest prefix that still fits.
//!
//! - [`rules`]: lookup table `Platform -> PlatformRules` (limit + counting method)
//! - [`weighted`]: [`WeightedCounter`] seam and the built-in Twitter v3 counter
//! - [`policy`]: [`ReplyLengthPolicy`] (count, apply limit, binary-search trim)
//!
//! Nothing here fails: a missing or failing weighted counter degrades to counting code points.

pub mod policy;
pub mod rules;
pub mod weighted;

pub use policy::{plain_count, PlatformCount, ReplyLengthPolicy, ReplyLengthPolicyResult};
pub use rules::{rules_for, CountMethod, PlatformRules, TWITTER_MAX_WEIGHTED_LENGTH};
pub use weighted::{CountError, TwitterTextCounter, WeightedCounter};
