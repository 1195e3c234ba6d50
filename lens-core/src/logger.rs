//! 日志初始化：stderr 一份、日志文件一份（追加写入，无 ANSI 颜色）；stdout 留给命令输出。

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy)]
pub struct TracingOptions<'a> {
    /// `None` 时只输出到 stderr。
    pub log_file: Option<&'a Path>,
    /// 未设置 RUST_LOG 时使用的过滤指令。
    pub default_directive: &'a str,
}

impl Default for TracingOptions<'_> {
    fn default() -> Self {
        Self {
            log_file: None,
            default_directive: "info",
        }
    }
}

/// 打开（必要时创建目录与文件）追加写入的日志文件。
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// 初始化全局 tracing：stderr + `log_file_path`。
/// 级别取自 RUST_LOG（需先 dotenvy::dotenv()），默认 info。
pub fn init_tracing(log_file_path: &str) -> Result<()> {
    init_tracing_with(TracingOptions {
        log_file: Some(Path::new(log_file_path)),
        ..TracingOptions::default()
    })
}

pub fn init_tracing_with(options: TracingOptions<'_>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(options.default_directive))
        .map_err(|e| CoreError::Logging(e.to_string()))?;

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);

    let file_layer = match options.log_file {
        Some(path) => {
            let file = Arc::new(open_log_file(path)?);
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_thread_ids(true)
                    .with_target(true),
            )
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))
}
