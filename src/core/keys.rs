//! Deployment key material.
//!
//! A deployment owns one AES-256 key and one GCM nonce. Both are created
//! once, stored remotely as a single text record and reused for the life of
//! the deployment's secret files. The same nonce seals every file of a
//! deployment.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::core::cipher::encode_b64;
use crate::core::constants::{KEY_LEN, NONCE_LEN};
use crate::core::types::{EncodedKey, EncodedNonce};
use crate::error::{KeyStoreError, Result};

/// Base64 key and nonce pair for one deployment.
///
/// The textual record form is `<base64-key>\n<base64-nonce>`. Secret text is
/// wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: EncodedKey,
    nonce: EncodedNonce,
}

impl KeyMaterial {
    /// Wrap an already encoded key and nonce.
    ///
    /// Sizes are not checked here; the cipher rejects malformed material.
    pub fn new(key: impl Into<EncodedKey>, nonce: impl Into<EncodedNonce>) -> Self {
        Self {
            key: key.into(),
            nonce: nonce.into(),
        }
    }

    /// Generate fresh material from the operating system RNG.
    pub fn generate() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(key.as_mut_slice());
        OsRng.fill_bytes(&mut nonce);

        Self {
            key: encode_b64(key.as_slice()),
            nonce: encode_b64(&nonce),
        }
    }

    /// Parse a key store record payload.
    ///
    /// A single trailing line ending is tolerated; anything other than
    /// exactly two fields is rejected.
    ///
    /// # Errors
    ///
    /// Returns `KeyStoreError::MalformedKeyRecord` naming `deployment`.
    pub fn parse(deployment: &str, payload: &str) -> Result<Self> {
        let body = payload
            .strip_suffix("\r\n")
            .or_else(|| payload.strip_suffix('\n'))
            .unwrap_or(payload);

        let fields: Vec<&str> = body.split('\n').collect();
        match fields.as_slice() {
            [key, nonce] if !key.is_empty() && !nonce.is_empty() => {
                Ok(Self::new(key.trim_end_matches('\r'), *nonce))
            }
            _ => Err(KeyStoreError::MalformedKeyRecord {
                name: deployment.to_string(),
                fields: fields.len(),
            }
            .into()),
        }
    }

    /// Record payload in the `<key>\n<nonce>` form.
    pub fn to_payload(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{}\n{}", self.key, self.nonce))
    }

    /// Base64 encoded key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base64 encoded nonce.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"<redacted>")
            .field("nonce", &self.nonce)
            .finish()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
    }
}
