//! AES-256-GCM codec producing self-describing JSON tokens.
//!
//! A token carries everything needed to open it except the key:
//!
//! ```json
//! { "iv": "<32 hex>", "authTag": "<32 hex>", "encrypted": "<hex>" }
//! ```
//!
//! A fresh random 16-byte nonce is drawn for every encryption, so the same
//! plaintext never produces the same token twice.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::key::CacheKey;

/// AES-256-GCM with a 128-bit nonce and a 128-bit tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// On-disk token shape. All fields are lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedToken {
    pub iv: String,
    pub auth_tag: String,
    pub encrypted: String,
}

/// Binary parts of a token after hex decoding.
struct TokenParts {
    nonce: [u8; NONCE_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl EncryptedToken {
    /// Strict shape check: returns `Some` only for JSON with all three fields
    /// holding valid hex of the expected lengths. Anything else is not a token.
    pub fn parse(text: &str) -> Option<Self> {
        let token: Self = serde_json::from_str(text.trim()).ok()?;
        token.decode().ok()?;
        Some(token)
    }

    /// Serialize the token to its JSON text form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn decode(&self) -> Result<TokenParts> {
        let nonce = decode_fixed::<NONCE_SIZE>("iv", &self.iv)?;
        let tag = decode_fixed::<TAG_SIZE>("authTag", &self.auth_tag)?;
        let ciphertext = hex::decode(&self.encrypted)
            .map_err(|e| VaultError::Decryption(format!("encrypted is not valid hex: {e}")))?;
        Ok(TokenParts {
            nonce,
            tag,
            ciphertext,
        })
    }
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(value)
        .map_err(|e| VaultError::Decryption(format!("{field} is not valid hex: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        VaultError::Decryption(format!("{field} has length {}, expected {N}", b.len()))
    })
}

/// Encrypts and decrypts payloads under one [`CacheKey`].
#[derive(Debug, Clone)]
pub struct Codec {
    key: CacheKey,
}

impl Codec {
    /// Create a codec bound to `key`.
    pub fn new(key: CacheKey) -> Self {
        Self { key }
    }

    fn cipher(&self) -> Aes256Gcm16 {
        Aes256Gcm16::new(GenericArray::from_slice(self.key.as_bytes()))
    }

    /// Encrypt `plaintext` into a token.
    pub fn seal(&self, plaintext: &[u8]) -> Result<EncryptedToken> {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher()
            .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", buffer.as_mut_slice())
            .map_err(|e| VaultError::Encryption(e.to_string()))?;

        Ok(EncryptedToken {
            iv: hex::encode(nonce),
            auth_tag: hex::encode(tag),
            encrypted: hex::encode(buffer),
        })
    }

    /// Decrypt and authenticate a token.
    pub fn open(&self, token: &EncryptedToken) -> Result<Vec<u8>> {
        let TokenParts {
            nonce,
            tag,
            mut ciphertext,
        } = token.decode()?;

        self.cipher()
            .decrypt_in_place_detached(
                GenericArray::from_slice(&nonce),
                b"",
                ciphertext.as_mut_slice(),
                GenericArray::from_slice(&tag),
            )
            .map_err(|_| {
                VaultError::Decryption(
                    "authentication failed: data was tampered with or sealed on another machine"
                        .to_string(),
                )
            })?;

        Ok(ciphertext)
    }

    /// Encrypt `plaintext` into token text.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        self.seal(plaintext)?.to_json()
    }

    /// Decrypt token text produced by [`Codec::encrypt`].
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>> {
        let token: EncryptedToken = serde_json::from_str(token.trim())
            .map_err(|e| VaultError::Decryption(format!("malformed token: {e}")))?;
        self.open(&token)
    }
}
