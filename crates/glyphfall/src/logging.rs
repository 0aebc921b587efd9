//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use glyphfall_config::{LoggingConfig, default_log_path};
use tracing::Level;

/// Install the global subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> color_eyre::Result<()> {
    if !config.enabled {
        return Ok(());
    }
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let level = config.level.parse::<Level>();
    tracing_subscriber::fmt()
        .with_max_level(*level.as_ref().unwrap_or(&Level::INFO))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!(err))?;

    if level.is_err() {
        tracing::warn!(level = %config.level, "unknown log level, using info");
    }
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
