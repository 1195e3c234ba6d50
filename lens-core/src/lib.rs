//! # lens-core
//!
//! Core types shared by every persona-lens crate: [`Platform`], [`MacroCategory`],
//! user and content snapshots, the core error type and tracing initialization.
//! Transport-agnostic; used by reply-length, prompt, classifier, profile-history and analyzer.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{CoreError, Result};
pub use logger::{init_tracing, init_tracing_with, TracingOptions};
pub use types::{ContentItem, ContentKind, MacroCategory, Platform, UserInfo};
