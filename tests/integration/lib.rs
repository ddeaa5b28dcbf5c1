//! Shared fixtures for the passcache integration tests.

use std::path::{Path, PathBuf};

use passcache_cache::CacheManager;
use passcache_vault::{CacheKey, Codec, MachineIdentity};
use tempfile::TempDir;

/// A scratch directory with a source export and a cache file location.
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
    pub cache_file: PathBuf,
}

impl Workspace {
    /// Create a workspace whose source file holds `contents`.
    pub fn with_source(contents: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let source = dir.path().join("export.csv");
        let cache_file = dir.path().join("cache").join("records.enc.json");
        std::fs::write(&source, contents).expect("write source");
        Self {
            dir,
            source,
            cache_file,
        }
    }

    /// Replace the source file contents.
    pub fn write_source(&self, contents: &str) {
        std::fs::write(&self.source, contents).expect("rewrite source");
    }

    /// Manager keyed to `identity`.
    pub fn manager_for(&self, identity: &MachineIdentity) -> CacheManager {
        let key = CacheKey::derive(identity).expect("derive key");
        CacheManager::new(
            Some(self.source.clone()),
            self.cache_file.clone(),
            Codec::new(key),
        )
    }

    /// Manager keyed to a fixed test identity.
    pub fn manager(&self) -> CacheManager {
        self.manager_for(&identity("test-host"))
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A machine identity that differs only by hostname.
pub fn identity(hostname: &str) -> MachineIdentity {
    MachineIdentity::new(hostname, "tester", "linux", "x86_64")
}
