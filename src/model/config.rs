use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest useful snapshot history: the current fetch plus one to undo to
pub const MIN_HISTORY_DEPTH: usize = 2;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Snapshot history capacity, never below [`MIN_HISTORY_DEPTH`]
    pub fn history_depth(&self) -> usize {
        self.history.depth.max(MIN_HISTORY_DEPTH)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the task endpoint, e.g. `http://127.0.0.1:8000`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout. Absent means calls wait until the transport resolves.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_depth")]
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            depth: default_history_depth(),
        }
    }
}

fn default_history_depth() -> usize {
    MIN_HISTORY_DEPTH
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (`background`, `text`, ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
