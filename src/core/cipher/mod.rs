//! Envelope cipher.
//!
//! Seals secret file content under a deployment's key material and encodes
//! the result as base64 text so it can live in a committed file.
//!
//! ## Format
//!
//! A sealed file is the standard-alphabet, padded base64 encoding of the
//! AES-256-GCM output (ciphertext followed by the 16-byte tag). There is no
//! header or version tag; see [`crate::core::detect`] for how sealed files
//! are told apart from plaintext.
//!
//! Key and nonce always travel as base64 text. This module does the
//! base64 ↔ raw conversions for them and for the blob itself.

use base64::alphabet;
use base64::engine::{general_purpose, GeneralPurpose};
use base64::Engine;

use crate::core::keys::KeyMaterial;
use crate::core::types::EncryptedBlob;
use crate::error::Result;

mod aes;

pub use aes::AesGcm;

/// Decoder that tolerates non-zero trailing bits, like most base64 producers.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_allow_trailing_bits(true),
);

/// Authenticated cipher over whole payloads.
///
/// Implementations must be deterministic for a given key material, and must
/// never hand back plaintext that failed authentication.
pub trait Cipher {
    /// Seal `plaintext` and return its base64 text.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyFormat` or `CipherError::NonceFormat` when
    /// the key material does not decode to the expected sizes.
    fn encrypt(&self, plaintext: &[u8], key: &KeyMaterial) -> Result<EncryptedBlob>;

    /// Open a base64 sealed blob.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Decode` for invalid base64 and
    /// `CipherError::Authentication` when the tag does not verify.
    fn decrypt(&self, blob: &str, key: &KeyMaterial) -> Result<Vec<u8>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// Encrypt `plaintext` with base64 `key` and `nonce`.
///
/// Convenience wrapper around [`AesGcm::encrypt`].
pub fn encrypt(key: &str, nonce: &str, plaintext: &[u8]) -> Result<EncryptedBlob> {
    AesGcm.encrypt(plaintext, &KeyMaterial::new(key, nonce))
}

/// Decrypt a base64 sealed `blob` with base64 `key` and `nonce`.
///
/// An empty blob yields empty output without touching the cipher.
pub fn decrypt(key: &str, nonce: &str, blob: &str) -> Result<Vec<u8>> {
    AesGcm.decrypt(blob, &KeyMaterial::new(key, nonce))
}

/// Encode raw bytes as standard padded base64.
pub(crate) fn encode_b64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 text, skipping line breaks.
pub(crate) fn decode_b64(text: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    if text.contains(['\r', '\n']) {
        let joined: String = text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        LENIENT.decode(joined)
    } else {
        LENIENT.decode(text)
    }
}
