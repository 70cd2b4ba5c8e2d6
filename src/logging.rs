use crate::models::Config;
use crate::utils::{APP_NAME, LOG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go: `log_file` from the config, else the user cache directory
pub fn log_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.log_file {
        return Ok(path.clone());
    }

    let mut path = dirs::cache_dir().context("Could not find cache directory")?;
    path.push(APP_NAME);
    path.push(LOG_FILE_NAME);
    Ok(path)
}

/// Install the global subscriber.
///
/// Logs go to a file because the TUI owns the terminal. `RUST_LOG` wins over
/// `log_level` when set.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = log_path(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(path)
}
