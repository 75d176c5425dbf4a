//! Key broker.
//!
//! Fetches a deployment's key material from the key store, creating it on
//! first use. No cryptography and no file I/O happen here.
//!
//! Get-then-create is not atomic: two first-time callers racing on the same
//! deployment can each create a record. The store offers no conditional
//! create, so the broker does not pretend to serialize them; later lookups
//! resolve to whichever record the store lists first.

use serde::{Deserialize, Serialize};

use crate::core::deployment::Deployment;
use crate::core::keys::KeyMaterial;
use crate::core::store::{KeyStore, NewSecret};
use crate::error::{KeyStoreError, Result};

/// What to do when several records share a deployment name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Use the first record listed.
    #[default]
    First,
    /// Fail with `KeyStoreError::Lookup`.
    Strict,
}

/// Get-or-create access to deployment keys.
pub struct KeyBroker<S> {
    store: S,
    policy: LookupPolicy,
}

impl<S: KeyStore> KeyBroker<S> {
    /// Broker over `store` using the first-match lookup policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: LookupPolicy::default(),
        }
    }

    /// Replace the lookup policy.
    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying key store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key material for `deployment`, created in the store if missing.
    ///
    /// # Errors
    ///
    /// - `KeyStoreError::Unavailable` if the store cannot be reached
    /// - `KeyStoreError::Lookup` for ambiguous names (strict policy) or
    ///   unparseable record references
    /// - `KeyStoreError::MalformedKeyRecord` if the payload is not a key pair
    pub fn get_or_create_key(&self, deployment: &Deployment) -> Result<KeyMaterial> {
        let name = deployment.as_str();
        let records = self.store.list(name)?;

        let Some(record) = records.first() else {
            let material = KeyMaterial::generate();
            let secret = NewSecret::aes_gcm_key(name, material.to_payload().to_string());
            self.store.create(&secret)?;
            return Ok(material);
        };

        if records.len() > 1 && self.policy == LookupPolicy::Strict {
            return Err(KeyStoreError::Lookup {
                name: name.to_string(),
                reason: format!("{} records share this name", records.len()),
            }
            .into());
        }

        let payload = zeroize::Zeroizing::new(self.store.payload(&record.id()?)?);
        KeyMaterial::parse(name, &payload)
    }
}
