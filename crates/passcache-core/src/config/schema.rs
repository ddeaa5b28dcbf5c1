//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Main passcache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source export settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Snapshot cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source export configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the delimited export file. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Snapshot cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Explicit snapshot path; defaults to `~/.passcache/cache/records.enc.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Encrypt the snapshot at rest.
    #[serde(default = "default_encrypt")]
    pub encrypt: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            encrypt: default_encrypt(),
        }
    }
}

fn default_encrypt() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
