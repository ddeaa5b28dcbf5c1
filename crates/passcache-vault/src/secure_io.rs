//! File I/O through the codec.
//!
//! Reads accept both encrypted tokens and legacy plaintext files written
//! before encryption was introduced. Writes replace the whole file via a
//! sibling temp file and then restrict it to mode `0600` on Unix.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::crypto::{Codec, EncryptedToken};
use crate::error::Result;

/// Contents of a file after the encrypted-or-plaintext decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// The file held a token; these are the authenticated plaintext bytes.
    Decrypted(Vec<u8>),
    /// The file did not have the token shape and is returned unchanged.
    Plain(Vec<u8>),
}

impl FileContent {
    /// Decide how to interpret `raw`. Anything with the token shape is treated
    /// as encrypted and must authenticate; everything else is plaintext.
    pub fn classify(raw: Vec<u8>, codec: &Codec) -> Result<Self> {
        let token = std::str::from_utf8(&raw).ok().and_then(EncryptedToken::parse);
        match token {
            Some(token) => codec.open(&token).map(Self::Decrypted),
            None => Ok(Self::Plain(raw)),
        }
    }

    /// Whether the bytes came from an encrypted token.
    pub fn was_encrypted(&self) -> bool {
        matches!(self, Self::Decrypted(_))
    }

    /// Take the plaintext bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Decrypted(bytes) | Self::Plain(bytes) => bytes,
        }
    }
}

/// Read `path` and return its plaintext.
///
/// Fails with [`crate::VaultError::Decryption`] only when the file looks like
/// a token but does not authenticate under `codec`.
pub async fn read_secure(path: &Path, codec: &Codec) -> Result<Vec<u8>> {
    read_file_content(path, codec).await.map(FileContent::into_bytes)
}

/// Read `path` and report whether it was encrypted.
pub async fn read_file_content(path: &Path, codec: &Codec) -> Result<FileContent> {
    let raw = tokio::fs::read(path).await?;
    let content = FileContent::classify(raw, codec)?;
    if !content.was_encrypted() {
        debug!(path = %path.display(), "read legacy plaintext file");
    }
    Ok(content)
}

/// Write `plaintext` to `path`, encrypting it unless `encrypt` is false.
///
/// Permission hardening is best-effort: a failure is logged and the write
/// still succeeds.
pub async fn write_secure(path: &Path, plaintext: &[u8], codec: &Codec, encrypt: bool) -> Result<()> {
    let data = if encrypt {
        codec.encrypt(plaintext)?.into_bytes()
    } else {
        plaintext.to_vec()
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = temp_path_for(path);
    tokio::fs::write(&temp_path, &data).await?;
    restrict_permissions(&temp_path).await;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    restrict_permissions(path).await;

    debug!(path = %path.display(), bytes = data.len(), encrypt, "wrote secure file");
    Ok(())
}

/// Restrict `path` to owner read/write. Returns whether it succeeded.
pub async fn restrict_permissions(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        match tokio::fs::set_permissions(path, perms).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), "could not restrict file permissions: {e}");
                false
            }
        }
    }

    #[cfg(not(unix))]
    {
        debug!(path = %path.display(), "permission hardening not supported on this platform");
        false
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
