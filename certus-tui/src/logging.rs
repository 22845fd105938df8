use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "certus";
const DEFAULT_DIRECTIVE: &str = "info";

/// Log to a daily file under `<root>/logs`; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn enable_logging(root: &Path, log_level: Option<&str>) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(root.join("logs"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}

/// Config value first, then `RUST_LOG`, then `info`.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => {
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
        }
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
        }
    }
}
