//! Content fingerprint of the source file.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `bytes`.
///
/// Equality of fingerprints is the only staleness signal; modification times
/// are ignored because copies and restores make them unreliable.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
