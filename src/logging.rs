//! File logging. The terminal belongs to the UI, so everything goes to
//! `<config_dir>/ffeed.log`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run or buffered lines are lost on exit.
///
/// `RUST_LOG` wins over the default level when set.
pub fn init(log_path: &Path, verbose: bool) -> Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .context("Log path has no parent directory")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_name = log_path
        .file_name()
        .context("Log path has no file name")?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ffeed={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::info!(path = %log_path.display(), verbose, "logging started");
    Ok(guard)
}
