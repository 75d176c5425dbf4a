//! In-memory key store.
//!
//! Keeps records in process memory. Used by tests and by callers that
//! embed the engine with their own key handling.

use std::cell::{Cell, RefCell};

use super::{KeyStore, NewSecret, SecretRecord};
use crate::error::{KeyStoreError, Result};

/// Key store backed by a vector of `(record, payload)` pairs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<(SecretRecord, String)>>,
    requests: Cell<usize>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one record named `name`.
    pub fn with_record(name: &str, payload: &str) -> Self {
        let store = Self::new();
        store.insert(name, payload);
        store
    }

    /// Add a record, even if one with the same name exists.
    pub fn insert(&self, name: &str, payload: &str) -> SecretRecord {
        let mut records = self.records.borrow_mut();
        let record = SecretRecord {
            name: name.to_string(),
            secret_ref: format!("memory://secrets/{}", records.len() + 1),
        };
        records.push((record.clone(), payload.to_string()));
        record
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of trait calls served so far.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    fn count(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

impl KeyStore for MemoryStore {
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>> {
        self.count();
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|(record, _)| record.name == name)
            .map(|(record, _)| record.clone())
            .collect())
    }

    fn create(&self, secret: &NewSecret) -> Result<SecretRecord> {
        self.count();
        Ok(self.insert(&secret.name, &secret.payload))
    }

    fn payload(&self, id: &str) -> Result<String> {
        self.count();
        self.records
            .borrow()
            .iter()
            .find(|(record, _)| record.id().is_ok_and(|rid| rid == id))
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| {
                KeyStoreError::Rejected {
                    status: 404,
                    body: format!("no secret with id {}", id),
                }
                .into()
            })
    }
}
