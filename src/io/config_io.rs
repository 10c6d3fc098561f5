use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::Config;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a config directory; pass --config")]
    NoConfigDir,
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
}

/// Default config location: `<config_dir>/tally/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("tally").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Resolve the config path from an optional override
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Read the config. A missing file yields defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the config as an editable document (empty when the file is missing)
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = if path.exists() {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        String::new()
    };
    text.parse().map_err(|e| ConfigError::EditError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the config document back, preserving formatting and comments
pub fn write_config_doc(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(path, doc.to_string().as_bytes())
    };
    write().map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set `remote.base_url` in the config document
pub fn set_base_url(doc: &mut toml_edit::DocumentMut, url: &str) {
    if !doc.contains_key("remote") {
        doc["remote"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["remote"]["base_url"] = toml_edit::value(url);
}

/// Set `remote.timeout_secs` in the config document
pub fn set_timeout(doc: &mut toml_edit::DocumentMut, secs: u64) {
    if !doc.contains_key("remote") {
        doc["remote"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["remote"]["timeout_secs"] = toml_edit::value(secs as i64);
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
