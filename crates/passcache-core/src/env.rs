//! Environment variable handling.

use std::env;
use std::path::PathBuf;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable as a path, expanding a leading `~`.
pub fn get_path(name: &str) -> Option<PathBuf> {
    get_var(name).map(|v| crate::paths::expand_tilde(v.trim()))
}

/// Name of the current OS user, as reported by the login environment.
pub fn current_user() -> String {
    get_var("USER")
        .or_else(|| get_var("USERNAME"))
        .or_else(|| get_var("LOGNAME"))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Common environment variable names.
pub mod vars {
    /// passcache home directory override.
    pub const PASSCACHE_HOME: &str = "PASSCACHE_HOME";

    /// passcache config file override.
    pub const PASSCACHE_CONFIG: &str = "PASSCACHE_CONFIG";

    /// Source export file override.
    pub const PASSCACHE_SOURCE: &str = "PASSCACHE_SOURCE";

    /// Cache file override.
    pub const PASSCACHE_CACHE_FILE: &str = "PASSCACHE_CACHE_FILE";
}
