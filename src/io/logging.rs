use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default log file: `<data_local_dir>/tally/logs/tally.log`
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("logs")
        .join("tally.log")
}

/// Map a configured level name to a tracing level (unknown names fall back to info)
pub fn parse_level(level: &str, verbose: bool) -> tracing::Level {
    if verbose {
        return tracing::Level::DEBUG;
    }
    level.parse().unwrap_or(tracing::Level::INFO)
}

/// Install a subscriber that writes to `log_path`, never to the terminal.
pub fn setup_logging(log_path: &Path, level: tracing::Level) -> io::Result<()> {
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(io::Error::other)?;

    info!(?level, "logging initialized");
    Ok(())
}
