//! Machine-bound key derivation.
//!
//! The snapshot key is never stored anywhere. It is re-derived on every run
//! from attributes of the machine and the logged-in user:
//!
//! 1. hostname
//! 2. OS user name
//! 3. OS platform (`linux`, `macos`, ...)
//! 4. CPU architecture (`x86_64`, `aarch64`, ...)
//!
//! joined with `|` and stretched with PBKDF2-HMAC-SHA256. A snapshot copied to
//! another machine therefore fails authentication instead of decoding. This
//! deters casual disk inspection and file exfiltration; it is not a boundary
//! against code already running as the same user.

use std::fmt;
use std::num::NonZeroU32;

use ring::pbkdf2;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Length of the derived key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// PBKDF2 work factor.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Application-specific PBKDF2 salt.
const KEY_SALT: &[u8] = b"passcache-machine-key-v1";

/// Separator between identity components.
const SEPARATOR: &str = "|";

/// Environmental attributes the key is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineIdentity {
    pub hostname: String,
    pub username: String,
    pub platform: String,
    pub arch: String,
}

impl MachineIdentity {
    /// Build an identity from explicit parts.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        platform: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            platform: platform.into(),
            arch: arch.into(),
        }
    }

    /// Read the identity of the machine this process runs on.
    pub fn current() -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|e| {
                debug!("hostname unavailable, using placeholder: {e}");
                "localhost".to_string()
            });

        Self::new(
            hostname,
            passcache_core::env::current_user(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }

    /// The PBKDF2 password: all components joined with [`SEPARATOR`].
    fn material(&self) -> Zeroizing<String> {
        Zeroizing::new(
            [
                self.hostname.as_str(),
                self.username.as_str(),
                self.platform.as_str(),
                self.arch.as_str(),
            ]
            .join(SEPARATOR),
        )
    }
}

/// A 256-bit symmetric key, scrubbed from memory on drop.
#[derive(Clone)]
pub struct CacheKey(Zeroizing<[u8; KEY_SIZE]>);

impl CacheKey {
    /// Derive the key for `identity`. Deterministic for identical identities.
    pub fn derive(identity: &MachineIdentity) -> Result<Self> {
        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| VaultError::KeyDerivation("iteration count must be non-zero".into()))?;

        let material = identity.material();
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            KEY_SALT,
            material.as_bytes(),
            &mut key[..],
        );

        debug!(
            platform = %identity.platform,
            arch = %identity.arch,
            "derived machine-bound cache key"
        );
        Ok(Self(key))
    }

    /// Derive the key for the current machine.
    pub fn for_current_machine() -> Result<Self> {
        Self::derive(&MachineIdentity::current())
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CacheKey([REDACTED])")
    }
}
