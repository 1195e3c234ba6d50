//! lens CLI: analyze profiles, draft replies, count reply length, manage the profile cache.

use anyhow::Result;
use clap::Parser;
use lens_cli::commands::{self, AnalyzeArgs};
use lens_cli::{Cli, Commands, LensConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = LensConfig::load()?;
    lens_core::init_tracing(&config.log_file)?;

    match cli.command {
        Commands::Analyze {
            platform,
            user,
            source,
            context,
            refresh,
            debug,
        } => {
            let args = AnalyzeArgs {
                platform,
                user,
                source,
                context,
                refresh,
                debug,
            };
            commands::analyze(&config, args, cli.json).await
        }
        Commands::Reply {
            platform,
            thread,
            instruction,
        } => commands::reply(&config, platform, thread, instruction, cli.json).await,
        Commands::Count { platform, text } => commands::count(platform, &text, cli.json),
        Commands::Classify { text, llm } => commands::classify_text(&config, &text, llm, cli.json).await,
        Commands::History { command } => commands::history(&config, command, cli.json).await,
    }
}
