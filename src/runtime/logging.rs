use std::fs;

use anyhow::{Context, Result};
use segue::config::{LoggingSettings, default_log_dir};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "segue.log";

/// Install the global subscriber.
///
/// With `to_stderr` unset, logs go to a daily rolling file so they never
/// land on the status line. The returned guard must be kept alive until
/// exit or buffered lines are lost.
pub fn init(settings: &LoggingSettings, to_stderr: bool) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the configured filter.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    if to_stderr {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(filter)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to install the log subscriber")?;
        return Ok(None);
    }

    let dir = settings
        .directory
        .clone()
        .or_else(default_log_dir)
        .context("no log directory: set logging.directory or HOME")?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    Ok(Some(guard))
}
