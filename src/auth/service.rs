//! Register and login use-cases
//!
//! `AuthService` composes the password hasher with a credential store. All
//! user-input failures resolve to enum or boolean results; errors escape only
//! for storage backend faults or a broken hashing environment. Raw passwords
//! never reach the log output.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AppError, HashError, StoreError};
use crate::models::Credential;
use crate::store::CredentialStore;

use super::password::PasswordHasher;

/// Outcome of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Username was free; credential stored
    Created,
    /// Username already registered; nothing stored
    Conflict,
    /// Input rejected before hashing
    Rejected(RejectReason),
}

/// Why a registration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Username empty after trimming
    #[error("Username cannot be empty")]
    EmptyUsername,
    /// Password empty
    #[error("Password cannot be empty")]
    EmptyPassword,
}

/// Authentication service
///
/// Implements the register and login use-cases on top of an injected
/// credential store.
pub struct AuthService<S: CredentialStore> {
    store: Arc<S>,
    hasher: PasswordHasher,
    /// Hash of a throwaway password, verified for unknown usernames so a
    /// login against a nonexistent user costs the same as a wrong password.
    decoy_hash: String,
}

impl<S: CredentialStore> AuthService<S> {
    /// Create a new authentication service
    ///
    /// Fails only if the hasher cannot produce the decoy hash, which
    /// indicates a broken hashing environment and should abort startup.
    pub fn new(store: Arc<S>, hasher: PasswordHasher) -> Result<Self, HashError> {
        let decoy_hash = hasher.hash("login-guard-decoy-password")?;
        Ok(Self {
            store,
            hasher,
            decoy_hash,
        })
    }

    /// Register a new username/password pair
    ///
    /// The username is trimmed before use. Empty username or password yields
    /// `Rejected`; a duplicate username yields `Conflict` without mutating
    /// the stored credential.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterOutcome, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(RegisterOutcome::Rejected(RejectReason::EmptyUsername));
        }
        if password.is_empty() {
            return Ok(RegisterOutcome::Rejected(RejectReason::EmptyPassword));
        }

        let hash = self.hasher.hash(password)?;
        let inserted = self
            .store
            .insert_if_absent(Credential::new(username, hash))
            .await?;

        if inserted {
            debug!(username = %username, "User registered");
            Ok(RegisterOutcome::Created)
        } else {
            debug!(username = %username, "Registration conflict: username taken");
            Ok(RegisterOutcome::Conflict)
        }
    }

    /// Verify a username/password pair against the stored credential
    ///
    /// Returns `false` for empty input, unknown usernames, wrong passwords,
    /// and unparseable stored hashes. Callers cannot distinguish an unknown
    /// username from a wrong password; a dummy verification runs for unknown
    /// usernames so the timing does not give the distinction away either.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let stored_hash = match self.store.get(username).await? {
            Some(credential) => credential.password_hash,
            None => {
                let _ = self.hasher.verify(password, &self.decoy_hash);
                debug!(username = %username, "Login failed");
                return Ok(false);
            }
        };

        match self.hasher.verify(password, &stored_hash) {
            Ok(matched) => {
                debug!(username = %username, success = matched, "Login attempt verified");
                Ok(matched)
            }
            Err(HashError::Malformed) => {
                warn!(username = %username, "Stored hash is unparseable, treating login as failed");
                Ok(false)
            }
            Err(e) => {
                warn!(username = %username, error = %e, "Verification error, treating login as failed");
                Ok(false)
            }
        }
    }
}
