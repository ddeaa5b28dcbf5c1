//! Error types for the cache layer.

use std::path::PathBuf;

use passcache_vault::VaultError;
use thiserror::Error;

/// Errors surfaced by [`crate::CacheManager`] and the ingestion pipeline.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(
        "No source file configured. Set source.path in the config file, \
         export PASSCACHE_SOURCE, or pass --source"
    )]
    SourceNotConfigured,

    #[error("Could not parse source file {}: {message}", path.display())]
    SourceFormat { path: PathBuf, message: String },

    #[error("Could not read source file {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
