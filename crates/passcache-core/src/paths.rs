//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// File name of the encrypted snapshot inside the cache directory.
pub const CACHE_FILE_NAME: &str = "records.enc.json";

/// Get the passcache base directory (`$PASSCACHE_HOME` or `~/.passcache`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(env::vars::PASSCACHE_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".passcache"))
}

/// Get the main config file path (~/.passcache/passcache.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("passcache.json5"))
}

/// Get the cache directory (~/.passcache/cache).
pub fn cache_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("cache"))
}

/// Get the default snapshot path (~/.passcache/cache/records.enc.json).
pub fn default_cache_file() -> Result<PathBuf, ConfigError> {
    Ok(cache_dir()?.join(CACHE_FILE_NAME))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Make a path absolute against the current directory without touching the
/// filesystem, so paths to files that do not exist yet still resolve.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
