//! AES-256-GCM cipher implementation.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::{decode_b64, encode_b64, Cipher};
use crate::core::constants::{KEY_LEN, NONCE_LEN};
use crate::core::keys::KeyMaterial;
use crate::core::types::EncryptedBlob;
use crate::error::{CipherError, Result};

/// AES-256-GCM with a caller-supplied nonce and no associated data.
pub struct AesGcm;

impl AesGcm {
    /// Decode and size-check the key material, then build the cipher.
    fn prepare(key: &KeyMaterial) -> Result<(Aes256Gcm, [u8; NONCE_LEN])> {
        let raw_key = Zeroizing::new(
            decode_b64(key.key()).map_err(|e| CipherError::KeyFormat(e.to_string()))?,
        );
        if raw_key.len() != KEY_LEN {
            return Err(CipherError::KeyFormat(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                raw_key.len()
            ))
            .into());
        }

        let raw_nonce =
            decode_b64(key.nonce()).map_err(|e| CipherError::NonceFormat(e.to_string()))?;
        let nonce: [u8; NONCE_LEN] = raw_nonce.as_slice().try_into().map_err(|_| {
            CipherError::NonceFormat(format!(
                "expected {} bytes, got {}",
                NONCE_LEN,
                raw_nonce.len()
            ))
        })?;

        let cipher = Aes256Gcm::new_from_slice(&raw_key)
            .map_err(|e| CipherError::KeyFormat(e.to_string()))?;
        Ok((cipher, nonce))
    }
}

impl Cipher for AesGcm {
    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }

    fn encrypt(&self, plaintext: &[u8], key: &KeyMaterial) -> Result<EncryptedBlob> {
        let (cipher, nonce) = Self::prepare(key)?;
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        Ok(encode_b64(&sealed))
    }

    fn decrypt(&self, blob: &str, key: &KeyMaterial) -> Result<Vec<u8>> {
        // Empty files round-trip to empty, whatever the key.
        if blob.is_empty() {
            return Ok(Vec::new());
        }

        let (cipher, nonce) = Self::prepare(key)?;
        let sealed = decode_b64(blob).map_err(CipherError::Decode)?;
        cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
            .map_err(|_| CipherError::Authentication.into())
    }
}
