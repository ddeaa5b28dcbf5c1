//! Configuration loading, persistence, and path resolution.

use super::Config;
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths supplied on the command line. These win over environment variables
/// and the config file.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    /// Source export file.
    pub source: Option<PathBuf>,
    /// Snapshot cache file.
    pub cache_file: Option<PathBuf>,
}

/// Locations the cache layer works with, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Absolute path to the source export, or `None` when unconfigured.
    pub source: Option<PathBuf>,
    /// Absolute path to the snapshot file.
    pub cache_file: PathBuf,
    /// Whether snapshots are written encrypted.
    pub encrypt: bool,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// when no file exists. Parse errors still surface.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let result = match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        };
        match result {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(missing)) => {
                debug!(path = %missing.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Some(source) = &self.source.path {
            if source.trim().is_empty() {
                errors.push("source.path must not be empty".to_string());
            }
        }

        if let Some(cache) = &self.cache.path {
            if cache.trim().is_empty() {
                errors.push("cache.path must not be empty".to_string());
            }
        }

        // The snapshot must never overwrite the export it was built from.
        if let (Some(source), Some(cache)) = (&self.source.path, &self.cache.path) {
            if !source.trim().is_empty()
                && paths::expand_tilde(source.trim()) == paths::expand_tilde(cache.trim())
            {
                errors.push(format!(
                    "cache.path '{}' must differ from source.path",
                    cache
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Resolve the source and cache locations.
    ///
    /// Priority: `overrides`, then `PASSCACHE_SOURCE` / `PASSCACHE_CACHE_FILE`,
    /// then this config, then the default cache location.
    pub fn resolve(&self, overrides: &PathOverrides) -> Result<ResolvedPaths, ConfigError> {
        let source = overrides
            .source
            .clone()
            .or_else(|| env::get_path(env::vars::PASSCACHE_SOURCE))
            .or_else(|| {
                self.source
                    .path
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(paths::expand_tilde)
            })
            .map(|p| paths::absolutize(&p));

        let cache_file = match overrides
            .cache_file
            .clone()
            .or_else(|| env::get_path(env::vars::PASSCACHE_CACHE_FILE))
            .or_else(|| {
                self.cache
                    .path
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(paths::expand_tilde)
            }) {
            Some(p) => paths::absolutize(&p),
            None => paths::default_cache_file()?,
        };

        if source.as_deref() == Some(cache_file.as_path()) {
            return Err(ConfigError::Validation(format!(
                "cache file {} must differ from the source file",
                cache_file.display()
            )));
        }

        debug!(
            source = ?source.as_ref().map(|p| p.display().to_string()),
            cache_file = %cache_file.display(),
            "resolved paths"
        );

        Ok(ResolvedPaths {
            source,
            cache_file,
            encrypt: self.cache.encrypt,
        })
    }

    /// Point the config at a new source file.
    pub fn set_source(&mut self, path: &Path) {
        self.source.path = Some(path.display().to_string());
    }
}
