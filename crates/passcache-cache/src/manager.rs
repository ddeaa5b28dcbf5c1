//! Snapshot lifecycle: load, freshness check, rebuild, persist, clear.
//!
//! The manager exclusively owns the snapshot file. A snapshot is served only
//! while its stored fingerprint matches the live source file; a mismatch, a
//! missing or unreadable cache, or an explicit force triggers a rebuild.
//!
//! ```text
//!   load(force) ──force──────────────────────────────► rebuild (Forced)
//!        │
//!        ├─ no cache file ─────────────────────────────► rebuild (Missing)
//!        ├─ decrypt/parse fails ─ delete file ─────────► rebuild (Corrupt)
//!        ├─ source absent ─────────────────────────────► serve cached
//!        ├─ fingerprint differs ───────────────────────► rebuild (Stale)
//!        └─ fingerprint matches ───────────────────────► serve cached
//! ```
//!
//! Rebuild errors propagate to the caller and leave the previous snapshot
//! file untouched. Cache read errors never propagate: the cache is
//! disposable and the source file is the ground truth.

use std::fmt;
use std::path::{Path, PathBuf};

use passcache_core::ResolvedPaths;
use passcache_vault::{restrict_permissions, write_secure, CacheKey, Codec, FileContent};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::fingerprint::fingerprint;
use crate::ingest;
use crate::types::{Credential, PaymentCard, SecureNote, Snapshot};

/// Observed condition of the on-disk snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// No snapshot file.
    Empty,
    /// Snapshot fingerprint matches the source file, or the source is absent.
    Fresh,
    /// Source file changed since the snapshot was built.
    Stale,
    /// Snapshot file exists but cannot be decrypted or parsed.
    Corrupt,
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Corrupt => "corrupt",
        };
        f.write_str(s)
    }
}

/// Why a snapshot was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildReason {
    Forced,
    Missing,
    Corrupt,
    Stale,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forced => "forced",
            Self::Missing => "missing",
            Self::Corrupt => "corrupt",
            Self::Stale => "stale",
        };
        f.write_str(s)
    }
}

/// Where a served snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Cached,
    Rebuilt(RebuildReason),
}

/// A served snapshot and how it was obtained.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub snapshot: Snapshot,
    pub origin: LoadOrigin,
}

/// Outcome of reading the snapshot file.
enum CacheRead {
    Missing,
    Corrupt(String),
    Present(Snapshot),
}

/// Owner of the encrypted snapshot file.
pub struct CacheManager {
    source: Option<PathBuf>,
    cache_file: PathBuf,
    codec: Codec,
    encrypt: bool,
    lock: Mutex<()>,
}

impl CacheManager {
    /// Create a manager that encrypts snapshots with `codec`.
    pub fn new(source: Option<PathBuf>, cache_file: PathBuf, codec: Codec) -> Self {
        Self {
            source,
            cache_file,
            codec,
            encrypt: true,
            lock: Mutex::new(()),
        }
    }

    /// Create a manager for resolved paths, keyed to the current machine.
    pub fn from_paths(paths: &ResolvedPaths) -> Result<Self> {
        let key = CacheKey::for_current_machine()?;
        Ok(Self::new(paths.source.clone(), paths.cache_file.clone(), Codec::new(key))
            .with_encryption(paths.encrypt))
    }

    /// Write snapshots in plaintext when `encrypt` is false.
    pub fn with_encryption(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    /// Configured source file, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Snapshot file location.
    pub fn cache_path(&self) -> &Path {
        &self.cache_file
    }

    /// Serve the current snapshot, rebuilding it when needed or when `force`.
    pub async fn load(&self, force: bool) -> Result<Loaded> {
        let source = self.source.as_deref().ok_or(CacheError::SourceNotConfigured)?;
        let _guard = self.lock.lock().await;

        if force {
            return self.rebuild(source, RebuildReason::Forced, None).await;
        }

        let snapshot = match self.read_cache().await {
            CacheRead::Present(snapshot) => snapshot,
            CacheRead::Missing => {
                return self.rebuild(source, RebuildReason::Missing, None).await;
            }
            CacheRead::Corrupt(reason) => {
                warn!(
                    path = %self.cache_file.display(),
                    "discarding unreadable cache: {reason}"
                );
                self.remove_cache_file().await;
                return self.rebuild(source, RebuildReason::Corrupt, None).await;
            }
        };

        let bytes = match tokio::fs::read(source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    source = %source.display(),
                    "source file unavailable, serving cached snapshot: {e}"
                );
                return Ok(Loaded {
                    snapshot,
                    origin: LoadOrigin::Cached,
                });
            }
        };

        if snapshot.is_stale_for(&fingerprint(&bytes)) {
            return self.rebuild(source, RebuildReason::Stale, Some(bytes)).await;
        }

        debug!(records = snapshot.total(), "serving fresh cached snapshot");
        Ok(Loaded {
            snapshot,
            origin: LoadOrigin::Cached,
        })
    }

    /// Serve the current snapshot.
    pub async fn get(&self, force: bool) -> Result<Snapshot> {
        self.load(force).await.map(|loaded| loaded.snapshot)
    }

    /// Rebuild unconditionally.
    pub async fn refresh(&self) -> Result<Snapshot> {
        self.get(true).await
    }

    /// Credentials from the current snapshot.
    pub async fn credentials(&self, force: bool) -> Result<Vec<Credential>> {
        self.get(force).await.map(|s| s.credentials)
    }

    /// Payment cards from the current snapshot.
    pub async fn cards(&self, force: bool) -> Result<Vec<PaymentCard>> {
        self.get(force).await.map(|s| s.cards)
    }

    /// Secure notes from the current snapshot.
    pub async fn notes(&self, force: bool) -> Result<Vec<SecureNote>> {
        self.get(force).await.map(|s| s.notes)
    }

    /// Delete the snapshot file. Idempotent and infallible.
    pub async fn clear(&self) {
        let _guard = self.lock.lock().await;
        self.remove_cache_file().await;
    }

    /// Inspect the snapshot without rebuilding or deleting anything.
    pub async fn status(&self) -> Result<CacheState> {
        let source = self.source.as_deref().ok_or(CacheError::SourceNotConfigured)?;
        let _guard = self.lock.lock().await;

        let snapshot = match self.read_cache().await {
            CacheRead::Missing => return Ok(CacheState::Empty),
            CacheRead::Corrupt(_) => return Ok(CacheState::Corrupt),
            CacheRead::Present(snapshot) => snapshot,
        };

        match tokio::fs::read(source).await {
            Ok(bytes) if snapshot.is_stale_for(&fingerprint(&bytes)) => Ok(CacheState::Stale),
            _ => Ok(CacheState::Fresh),
        }
    }

    async fn read_cache(&self) -> CacheRead {
        let raw = match tokio::fs::read(&self.cache_file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheRead::Missing,
            Err(e) => return CacheRead::Corrupt(e.to_string()),
        };

        let plaintext = match FileContent::classify(raw, &self.codec) {
            Ok(content) => content.into_bytes(),
            Err(e) => return CacheRead::Corrupt(e.to_string()),
        };

        match serde_json::from_slice::<Snapshot>(&plaintext) {
            Ok(snapshot) => CacheRead::Present(snapshot),
            Err(e) => CacheRead::Corrupt(format!("invalid snapshot document: {e}")),
        }
    }

    /// Parse the source, stamp and persist a new snapshot. `bytes` reuses a
    /// read already done by the caller so the fingerprint matches the parse.
    async fn rebuild(
        &self,
        source: &Path,
        reason: RebuildReason,
        bytes: Option<Vec<u8>>,
    ) -> Result<Loaded> {
        let bytes = match bytes {
            Some(bytes) => bytes,
            None => tokio::fs::read(source)
                .await
                .map_err(|e| CacheError::SourceUnavailable {
                    path: source.to_path_buf(),
                    source: e,
                })?,
        };

        let report = ingest::parse_bytes(&bytes, source)?;
        restrict_permissions(source).await;

        let snapshot = Snapshot::new(report.credentials, report.cards, report.notes, fingerprint(&bytes));
        let document = serde_json::to_vec(&snapshot)?;

        // A snapshot that fails to persist is still correct for this call.
        if let Err(e) = write_secure(&self.cache_file, &document, &self.codec, self.encrypt).await {
            warn!(path = %self.cache_file.display(), "could not persist snapshot: {e}");
        }

        info!(
            %reason,
            credentials = snapshot.credentials.len(),
            cards = snapshot.cards.len(),
            notes = snapshot.notes.len(),
            skipped = report.skipped_rows,
            "rebuilt snapshot"
        );

        Ok(Loaded {
            snapshot,
            origin: LoadOrigin::Rebuilt(reason),
        })
    }

    async fn remove_cache_file(&self) {
        match tokio::fs::remove_file(&self.cache_file).await {
            Ok(()) => debug!(path = %self.cache_file.display(), "removed cache file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.cache_file.display(), "could not remove cache file: {e}"),
        }
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("source", &self.source)
            .field("cache_file", &self.cache_file)
            .field("encrypt", &self.encrypt)
            .finish_non_exhaustive()
    }
}
