//! # lens-cli
//!
//! Command-line surface of persona-lens: argument parsing, env config, the JSON-export
//! platform source and the subcommand handlers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod json_source;

pub use cli::{Cli, Commands, HistoryCommand};
pub use config::LensConfig;
pub use json_source::JsonFileSource;
