//! Subcommand handlers. Results go to stdout; logs go to stderr and the log file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use analyzer::{
    AnalyzeError, AnalyzeRequest, AnalyzeResponse, ProfileAnalyzer, ReplyDrafter, ReplyRequest,
};
use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use classifier::{classify, resolve_category};
use lens_core::{MacroCategory, Platform};
use llm_client::{mask_token, EnvLlmConfig, LlmClient, LlmConfig, OpenAiCompatibleClient};
use profile_history::{HistoryService, SqliteKvStore, UserHistoryRecord};
use reply_length::ReplyLengthPolicy;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::cli::HistoryCommand;
use crate::config::LensConfig;
use crate::json_source::JsonFileSource;

const SUMMARY_PREVIEW_CHARS: usize = 80;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns an analysis failure into the fixed user-facing message, keeping the cause for logs.
fn user_facing(e: AnalyzeError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", e.user_message(), e)
}

fn format_ms(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn preview(value: &serde_json::Value) -> String {
    let text = value
        .get("summary")
        .and_then(|s| s.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string());
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= SUMMARY_PREVIEW_CHARS {
        flat
    } else {
        let head: String = flat.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!("{}…", head)
    }
}

/// Opens the SQLite history store, creating the parent directory of file paths.
pub async fn open_history(config: &LensConfig) -> Result<Arc<HistoryService>> {
    let path = config.history_db_path.as_str();
    if !path.contains(":memory:") {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Create history directory {}", parent.display()))?;
            }
        }
    }
    let store = SqliteKvStore::new(path)
        .await
        .with_context(|| format!("Open history database {} (check HISTORY_DB_PATH)", path))?;
    Ok(Arc::new(HistoryService::new(Arc::new(store))))
}

/// Builds the LLM client from `LLM_*` environment variables.
pub fn build_llm() -> Result<Arc<dyn LlmClient>> {
    let llm_config = EnvLlmConfig::from_env()
        .context("Load LLM config from .env (LLM_PROVIDER, LLM_API_KEY, LLM_BASE_URL, LLM_MODEL)")?;
    let client = OpenAiCompatibleClient::from_config(&llm_config);
    info!(
        provider = %llm_config.provider(),
        base_url = %llm_config.base_url(),
        model = %client.model(),
        api_key = %mask_token(llm_config.api_key()),
        "LLM client configured"
    );
    Ok(Arc::new(client))
}

pub struct AnalyzeArgs {
    pub platform: Platform,
    pub user: String,
    pub source: PathBuf,
    pub context: Option<String>,
    pub refresh: bool,
    pub debug: bool,
}

pub async fn analyze(config: &LensConfig, args: AnalyzeArgs, as_json: bool) -> Result<()> {
    let history = open_history(config).await?;
    let llm = build_llm()?;
    let mut settings = config.analyzer_settings();
    settings.debug |= args.debug;

    let analyzer = ProfileAnalyzer::new(
        llm,
        Arc::new(JsonFileSource::new(args.source)),
        history,
        settings,
    );
    let response = analyzer
        .analyze(AnalyzeRequest {
            user_id: args.user,
            platform: args.platform,
            context: args.context,
            force_refresh: args.refresh,
        })
        .await
        .map_err(user_facing)?;

    if as_json {
        return print_json(&response);
    }
    print_analysis(&response)
}

fn print_analysis(response: &AnalyzeResponse) -> Result<()> {
    let origin = match response.cached_at {
        Some(at) if response.from_cache => format!("cached {}", format_ms(at)),
        _ => format!("generated in {} ms", response.metrics.total_ms),
    };
    if let Some(user) = &response.user_info {
        println!("User:     {}", user.name);
    }
    println!("Category: {} ({})", response.category.label(), response.category.id());
    println!("Model:    {} [{}]", response.model, origin);
    if !response.from_cache {
        println!("Items:    {}", response.items.len());
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&response.profile)?);
    if let Some(debug) = &response.debug {
        println!();
        println!(
            "--- debug: fetched {}, relevant {}, used {} ---",
            debug.total_fetched, debug.total_relevant, debug.items_used
        );
        println!("{}", debug.prompt);
        println!("--- raw output ---");
        println!("{}", debug.raw_output);
    }
    Ok(())
}

pub async fn reply(
    config: &LensConfig,
    platform: Platform,
    thread: String,
    instruction: Option<String>,
    as_json: bool,
) -> Result<()> {
    let drafter = ReplyDrafter::new(
        build_llm()?,
        ReplyLengthPolicy::new(),
        config.analyzer_settings(),
    );
    let draft = drafter
        .draft(ReplyRequest {
            platform,
            thread,
            instruction,
        })
        .await
        .map_err(user_facing)?;

    if as_json {
        return print_json(&draft);
    }
    println!("{}", draft.text);
    if draft.length.was_trimmed {
        eprintln!(
            "(trimmed from {} to {} of {})",
            draft.length.original_count,
            draft.length.final_count,
            draft.length.limit.unwrap_or_default()
        );
    }
    Ok(())
}

pub fn count(platform: Platform, text: &str, as_json: bool) -> Result<()> {
    let policy = ReplyLengthPolicy::new();
    let result = policy.apply_limit(text, platform);
    if as_json {
        return print_json(&result);
    }
    let limit = result
        .limit
        .map(|l| l.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!(
        "{}: {} ({:?}), limit {}",
        platform.display_name(),
        result.original_count,
        result.count_method,
        limit
    );
    if result.was_trimmed {
        println!("Trimmed ({}):", result.final_count);
        println!("{}", result.text);
    }
    Ok(())
}

pub async fn classify_text(
    config: &LensConfig,
    text: &str,
    use_llm: bool,
    as_json: bool,
) -> Result<()> {
    let category: MacroCategory = if use_llm {
        let llm = build_llm()?;
        resolve_category(llm.as_ref(), text, config.llm_timeout).await
    } else {
        classify(text)
    };
    if as_json {
        return print_json(&json!({ "id": category.id(), "label": category.label() }));
    }
    println!("{} ({})", category.id(), category.label());
    Ok(())
}

fn print_record(record: &UserHistoryRecord) {
    let name = record
        .user_info
        .as_ref()
        .map(|u| u.name.as_str())
        .unwrap_or("-");
    println!(
        "{:<10} {:<24} {:<20} {:<20} {}",
        record.platform.as_str(),
        record.user_id,
        name,
        format_ms(record.last_updated),
        record.profiles.keys().cloned().collect::<Vec<_>>().join(",")
    );
}

pub async fn history(config: &LensConfig, command: HistoryCommand, as_json: bool) -> Result<()> {
    let history = open_history(config).await?;
    match command {
        HistoryCommand::List => {
            let records = history.get_all_user_records().await?;
            if as_json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No cached profiles (path: {}).", config.history_db_path);
                return Ok(());
            }
            println!(
                "{:<10} {:<24} {:<20} {:<20} {}",
                "platform", "user_id", "name", "last_updated", "categories"
            );
            println!("{}", "-".repeat(100));
            for record in &records {
                print_record(record);
            }
        }
        HistoryCommand::Show { platform, user } => {
            let Some(record) = history.get_user_record(&user, platform).await? else {
                anyhow::bail!("No cached profiles for {} on {}", user, platform.display_name());
            };
            if as_json {
                return print_json(&record);
            }
            print_record(&record);
            for (category, profile) in &record.profiles {
                let state = if history.is_fresh(profile) { "fresh" } else { "expired" };
                println!(
                    "  {:<14} {:<8} {} {}",
                    category,
                    state,
                    format_ms(profile.timestamp),
                    preview(&profile.profile_data)
                );
            }
        }
        HistoryCommand::Delete {
            platform,
            user,
            category,
        } => {
            match category {
                Some(category) => history.delete_profile(&user, platform, &category).await?,
                None => history.delete_user_record(&user, platform).await?,
            }
            println!("Deleted.");
        }
        HistoryCommand::Clear => {
            history.clear_all().await?;
            println!("History cleared.");
        }
    }
    Ok(())
}
