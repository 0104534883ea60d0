//! In-memory credential store
//!
//! Process-lifetime credential storage backed by a sharded concurrent map.
//! Insert-if-absent goes through the map's per-key entry API, so racing
//! registrations for the same username serialize on that key without a
//! global lock.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::models::Credential;

use super::CredentialStore;

/// In-memory credential store
///
/// Lives for the process lifetime; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    credentials: DashMap<String, Credential>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_if_absent(&self, credential: Credential) -> Result<bool, StoreError> {
        match self.credentials.entry(credential.username.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(credential);
                Ok(true)
            }
        }
    }

    async fn get(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.get(username).map(|c| c.clone()))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.credentials.len() as u64)
    }
}
