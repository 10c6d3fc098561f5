use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::config_io::atomic_write;
use crate::model::task::Filter;

/// Persisted TUI state (written to state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Active list filter
    #[serde(default)]
    pub filter: Filter,
    /// Cursor position in the filtered list
    #[serde(default)]
    pub cursor: usize,
}

/// Default location: `<data_local_dir>/tally/state.json`
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("tally").join("state.json"))
}

/// Read state.json; missing or malformed files yield None
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json, creating its directory
pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(path, content.as_bytes())
}
