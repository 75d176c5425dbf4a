//! Key store collaborators.
//!
//! The remote KMS is consumed through the narrow [`KeyStore`] trait: list
//! records by name, create a record, fetch a record's payload. Everything
//! else about the service (transport, auth, durability) stays behind it.
//!
//! ## Adding a New Key Store
//!
//! 1. Implement the `KeyStore` trait
//! 2. Add the implementation in a new file (e.g., `vault.rs`)
//! 3. Re-export from this module

use crate::core::constants;
use crate::core::types::SecretId;
use crate::error::{KeyStoreError, Result};

mod barbican;
mod memory;

pub use barbican::{Barbican, Credentials, LazyBarbican, ProjectScope};
pub use memory::MemoryStore;

/// A record as returned by a name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Record name (the deployment name).
    pub name: String,
    /// Reference URL; its last path segment is the record id.
    pub secret_ref: String,
}

impl SecretRecord {
    /// Record id derived from the reference URL.
    ///
    /// # Errors
    ///
    /// Returns `KeyStoreError::Lookup` if the reference has no path segment.
    pub fn id(&self) -> Result<SecretId> {
        parse_id(&self.name, &self.secret_ref)
    }
}

/// Attributes of a record to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSecret {
    pub name: String,
    pub algorithm: &'static str,
    pub bit_length: u32,
    pub mode: &'static str,
    pub payload: String,
    pub payload_content_type: &'static str,
    pub secret_type: &'static str,
}

impl NewSecret {
    /// A 256-bit AES-GCM key record carrying `payload`.
    pub fn aes_gcm_key(name: &str, payload: String) -> Self {
        Self {
            name: name.to_string(),
            algorithm: constants::KEY_ALGORITHM,
            bit_length: constants::KEY_BIT_LENGTH,
            mode: constants::KEY_MODE,
            payload,
            payload_content_type: constants::KEY_CONTENT_TYPE,
            secret_type: constants::KEY_SECRET_TYPE,
        }
    }
}

/// Remote store of named secret records.
///
/// Implementations map transport and auth failures to
/// `KeyStoreError::Unavailable`.
pub trait KeyStore {
    /// All records whose name equals `name`, in the store's order.
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>>;

    /// Create a record and return it.
    fn create(&self, secret: &NewSecret) -> Result<SecretRecord>;

    /// Payload of the record with id `id`.
    fn payload(&self, id: &str) -> Result<String>;
}

impl<S: KeyStore + ?Sized> KeyStore for Box<S> {
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>> {
        (**self).list(name)
    }

    fn create(&self, secret: &NewSecret) -> Result<SecretRecord> {
        (**self).create(secret)
    }

    fn payload(&self, id: &str) -> Result<String> {
        (**self).payload(id)
    }
}

impl<S: KeyStore + ?Sized> KeyStore for &S {
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>> {
        (**self).list(name)
    }

    fn create(&self, secret: &NewSecret) -> Result<SecretRecord> {
        (**self).create(secret)
    }

    fn payload(&self, id: &str) -> Result<String> {
        (**self).payload(id)
    }
}

/// Last path segment of a reference URL.
fn parse_id(name: &str, secret_ref: &str) -> Result<SecretId> {
    let trimmed = secret_ref.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, id)) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(KeyStoreError::Lookup {
            name: name.to_string(),
            reason: format!("could not parse record reference '{}'", secret_ref),
        }
        .into()),
    }
}
