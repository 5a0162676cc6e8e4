//! Name-field encryption.
//!
//! The record name is sealed with AES-256-GCM before it touches the
//! database. The key is derived from a caller-supplied secret on every
//! call; nothing key-related is persisted with the record, so rotating the
//! secret requires a data migration.

use crate::error::{MetadataError, MetadataResult};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Symmetric key for sealing the record name field.
///
/// Request-scoped material: derive it at the call site, pass it down by
/// reference, drop it. Never cached, never logged.
#[derive(Clone)]
pub struct NameKey([u8; 32]);

impl NameKey {
    /// Derive a key from a caller-supplied secret.
    pub fn derive(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self(digest.into())
    }

    /// Encrypt a plaintext name. Output layout: `nonce || ciphertext`.
    pub fn seal(&self, name: &str) -> MetadataResult<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.0)
            .map_err(|e| MetadataError::Crypto(e.to_string()))?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, name.as_bytes())
            .map_err(|e| MetadataError::Crypto(e.to_string()))?;
        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt a sealed name produced by [`seal`](Self::seal).
    pub fn open(&self, sealed: &[u8]) -> MetadataResult<String> {
        if sealed.len() < NONCE_LEN {
            return Err(MetadataError::Crypto("sealed name too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.0)
            .map_err(|e| MetadataError::Crypto(e.to_string()))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| MetadataError::Crypto("name decryption failed".to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|_| MetadataError::Crypto("decrypted name is not utf-8".to_string()))
    }
}

impl std::fmt::Debug for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NameKey").field(&"<redacted>").finish()
    }
}
