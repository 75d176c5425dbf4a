//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A base64 encoded AES-256 key (32 raw bytes).
pub type EncodedKey = String;

/// A base64 encoded GCM nonce (12 raw bytes).
pub type EncodedNonce = String;

/// Base64 text of a sealed ciphertext, as stored in a secret file.
pub type EncryptedBlob = String;

/// Identifier of a record in the key store (last segment of its reference URL).
pub type SecretId = String;
