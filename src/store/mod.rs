//! Credential storage layer for login-guard
//!
//! This module defines the storage trait and the in-memory implementation.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Credential;

/// Storage trait for credential persistence
///
/// The service only needs atomic insert-if-absent and lookup; there is no
/// update or delete. The in-memory implementation never fails, but the trait
/// is fallible so a durable backend can be swapped in without touching the
/// auth layer. Uses `async_trait` for async methods and `mockall::automock`
/// for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a credential iff no entry exists for its username
    ///
    /// Returns `true` and stores the credential if the username was absent,
    /// `false` without mutating anything if it was already present. Exactly
    /// one concurrent caller wins a race on the same username.
    async fn insert_if_absent(&self, credential: Credential) -> Result<bool, StoreError>;

    /// Look up a credential by username
    ///
    /// Returns `None` if no credential is stored for the username.
    async fn get(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Number of stored credentials
    async fn count(&self) -> Result<u64, StoreError>;
}
