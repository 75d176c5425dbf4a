//! Sealed content detection.
//!
//! Secret files carry no header, so the only signal that a file is sealed is
//! that its whole content is valid base64. Plaintext that happens to be valid
//! base64 (a single word of the right length, for example) is
//! indistinguishable from a sealed blob. Every "is this sealed?" decision in
//! the crate goes through [`looks_encrypted`].

use crate::core::cipher::decode_b64;

/// Whether `content` looks like a sealed blob.
///
/// The empty string counts as sealed, since it is valid base64.
pub fn looks_encrypted(content: &str) -> bool {
    decode_b64(content).is_ok()
}

/// Byte-oriented variant for file content that may not be UTF-8.
pub fn looks_encrypted_bytes(content: &[u8]) -> bool {
    std::str::from_utf8(content).is_ok_and(looks_encrypted)
}
