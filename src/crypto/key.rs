//! Master key material
//!
//! The master key is 32 bytes from the OS random generator. It is persisted
//! and handed to SQLCipher as 64 lowercase hex characters.

use std::fmt;
use rand::TryRngCore;
use rand::rngs::OsRng;
use crate::error::{CacheError, Result};

/// Key length for AES-256 (32 bytes = 256 bits)
pub const KEY_LENGTH: usize = 32;

/// Length of the hex-encoded key
pub const KEY_HEX_LENGTH: usize = KEY_LENGTH * 2;

/// The 256-bit symmetric key protecting the cache file
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    bytes: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Generate fresh key material from the OS random generator
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CacheError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Parse a stored hex key. Anything but 64 hex characters is rejected.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.len() != KEY_HEX_LENGTH {
            return Err(CacheError::KeychainReadFailed(format!(
                "stored key has wrong length: {} (expected {})",
                encoded.len(),
                KEY_HEX_LENGTH
            )));
        }

        let mut bytes = [0u8; KEY_LENGTH];
        hex::decode_to_slice(encoded, &mut bytes)
            .map_err(|e| CacheError::KeychainReadFailed(format!("stored key is not hex: {}", e)))?;
        Ok(Self { bytes })
    }

    /// Lowercase hex form, as stored in the secret store
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
