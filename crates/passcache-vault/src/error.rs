//! Error types for the vault layer.

use thiserror::Error;

/// Errors that can occur while deriving keys or moving bytes through the codec.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The token is malformed, was tampered with, or was sealed under another key.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
