//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lens_core::Platform;

#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "persona-lens: profile analysis, reply drafting and length checks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a user's public content (cached per macro-category for 24h).
    Analyze {
        #[arg(short, long)]
        platform: Platform,
        #[arg(short, long)]
        user: String,
        /// Export file, or directory of `<platform>/<user>.json` exports.
        #[arg(short, long)]
        source: PathBuf,
        /// What you want to know about this user.
        #[arg(short, long)]
        context: Option<String>,
        /// Ignore the cache and regenerate.
        #[arg(long)]
        refresh: bool,
        /// Attach prompt and raw LLM output.
        #[arg(long)]
        debug: bool,
    },
    /// Draft a reply that fits the platform's length limit.
    Reply {
        #[arg(short, long)]
        platform: Platform,
        /// Text being replied to.
        #[arg(short, long)]
        thread: String,
        /// What the reply should say.
        #[arg(short, long)]
        instruction: Option<String>,
    },
    /// Count text the way the platform does and show the trimmed version when over limit.
    Count {
        #[arg(short, long)]
        platform: Platform,
        text: String,
    },
    /// Classify text into a macro-category.
    Classify {
        text: String,
        /// Ask the LLM when keywords do not match.
        #[arg(long)]
        llm: bool,
    },
    /// Inspect or edit the profile cache.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List cached users, most recent first.
    List,
    /// Show every cached profile of one user.
    Show {
        #[arg(short, long)]
        platform: Platform,
        #[arg(short, long)]
        user: String,
    },
    /// Delete one category (with --category) or the whole user record.
    Delete {
        #[arg(short, long)]
        platform: Platform,
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete all cached profiles.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "lens", "analyze", "-p", "x", "-u", "jack", "-s", "exports", "-c", "ai safety", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Analyze {
                platform,
                user,
                context,
                refresh,
                ..
            } => {
                assert_eq!(platform, Platform::Twitter);
                assert_eq!(user, "jack");
                assert_eq!(context.as_deref(), Some("ai safety"));
                assert!(!refresh);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_history_delete_and_bad_platform() {
        let cli = Cli::try_parse_from([
            "lens", "history", "delete", "-p", "zhihu", "-u", "u1", "-c", "technology",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::Delete { category: Some(_), .. }
            }
        ));
        assert!(Cli::try_parse_from(["lens", "count", "-p", "myspace", "hi"]).is_err());
    }
}
