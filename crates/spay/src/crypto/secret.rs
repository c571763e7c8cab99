//! [`SharedSecret`]: the client's immutable 3DES key and IV.

use std::fmt;

use tracing::debug;

use super::cipher::{self, CipherError, IV_LEN, KEY_LEN};
use crate::bitstring::BitString;
use crate::error::SpayError;

/// Key and IV shared with the gateway, fixed for the lifetime of a client.
///
/// Built once from configuration and never mutated, so a single value can be
/// shared read-only across concurrent calls. Both buffers are overwritten
/// with zeroes on drop.
#[derive(Clone)]
pub struct SharedSecret {
    key: Box<[u8; KEY_LEN]>,
    iv: [u8; IV_LEN],
}

impl SharedSecret {
    /// Build from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is [`KEY_LEN`]
    /// bytes, and [`CipherError::InvalidIvLength`] unless `iv` is [`IV_LEN`]
    /// bytes.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|_| CipherError::InvalidIvLength(iv.len()))?;
        Ok(Self {
            key: Box::new(key),
            iv,
        })
    }

    /// Decode the configured bit-strings and build the secret.
    ///
    /// # Errors
    ///
    /// Returns [`SpayError::Format`] if either string contains a non-binary
    /// digit and [`SpayError::Cipher`] if the decoded lengths are wrong.
    pub fn from_bit_strings(key: &BitString, iv: &BitString) -> Result<Self, SpayError> {
        let key_bytes = key.to_bytes()?;
        let iv_bytes = iv.to_bytes()?;
        let secret = Self::new(&key_bytes, &iv_bytes)?;
        debug!(
            key_len = key_bytes.len(),
            iv_len = iv_bytes.len(),
            "shared secret materialised from bit-strings"
        );
        Ok(secret)
    }

    pub fn key(&self) -> &[u8] {
        &self.key[..]
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Encrypt with this secret. See [`cipher::encrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        cipher::encrypt(plaintext, self.key(), self.iv())
    }

    /// Decrypt with this secret. Pad bytes are kept; see [`cipher::decrypt`].
    pub fn decrypt(&self, payload: &str) -> Result<Vec<u8>, CipherError> {
        cipher::decrypt(payload, self.key(), self.iv())
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.key.iter_mut().for_each(|b| *b = 0);
        self.iv.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.write_str("SharedSecret([REDACTED])")
    }
}
