//! File-only logging setup. The TUI owns the terminal, so nothing is
//! ever written to stdout; logs go to a file under the platform data
//! directory (override with `SCRIBE_LOG_FILE`).
//!
//! Filtering follows `SCRIBE_LOG`, then `RUST_LOG`, then `info`.

use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keep this alive for the lifetime of the program; dropping it
/// flushes and stops the background file writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(
    log_file_override: Option<PathBuf>,
) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let log_file = resolve_log_path(log_file_override);
    let log_dir = log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)?;
    let filename = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scribe.log".to_string());

    let appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (writer, file_guard) = tracing_appender::non_blocking(appender);

    let filter = env_filter();
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    // try_init so a second call (tests, restarts) is not fatal.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file,
    })
}

fn env_filter() -> EnvFilter {
    if let Ok(spec) = env::var("SCRIBE_LOG") {
        if let Ok(filter) = EnvFilter::try_new(&spec) {
            return filter;
        }
    }
    if let Ok(spec) = env::var("RUST_LOG") {
        if let Ok(filter) = EnvFilter::try_new(&spec) {
            return filter;
        }
    }
    EnvFilter::new("info")
}

fn resolve_log_path(log_file_override: Option<PathBuf>) -> PathBuf {
    if let Some(path) = log_file_override {
        return path;
    }
    if let Ok(path) = env::var("SCRIBE_LOG_FILE") {
        return PathBuf::from(path);
    }
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("scribe").join("logs").join("scribe.log")
}
