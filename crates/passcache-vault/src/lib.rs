//! Machine-bound encryption for the passcache snapshot file.
//!
//! Provides a PBKDF2-SHA256 key derived from the machine identity, an
//! AES-256-GCM codec producing self-describing JSON tokens, and file I/O that
//! reads and writes through the codec with owner-only permissions.

pub mod crypto;
pub mod error;
pub mod key;
pub mod secure_io;

pub use crypto::{Codec, EncryptedToken};
pub use error::{Result, VaultError};
pub use key::{CacheKey, MachineIdentity};
pub use secure_io::{read_file_content, read_secure, restrict_permissions, write_secure, FileContent};
