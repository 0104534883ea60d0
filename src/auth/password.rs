//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id in PHC string format. Every hash embeds
//! a fresh random salt and the parameters it was produced with, so two hashes
//! of the same password differ while both verify. The iteration count is the
//! tunable work factor; memory cost and parallelism stay at the library
//! defaults.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::error::HashError;

/// Salted one-way password hasher
///
/// Construction validates the work factor and runs a self-test hash, so a
/// misconfigured deployment fails at startup instead of failing every
/// request.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with the given work factor (Argon2 iteration count)
    ///
    /// # Errors
    ///
    /// `HashError::InvalidParams` if the work factor is outside the
    /// algorithm's limits, `HashError::HashFailed` if the self-test hash
    /// cannot be produced.
    pub fn new(work_factor: u32) -> Result<Self, HashError> {
        let params = Params::new(Params::DEFAULT_M_COST, work_factor, Params::DEFAULT_P_COST, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        let hasher = Self { params };

        // Exercise the full hash/verify path once before accepting traffic
        let probe = hasher.hash("startup-self-test")?;
        if !hasher.verify("startup-self-test", &probe)? {
            return Err(HashError::HashFailed(
                "self-test verification failed".to_string(),
            ));
        }

        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a per-call random salt
    ///
    /// Returns the PHC hash string (e.g. `$argon2id$v=19$...`).
    ///
    /// # Errors
    ///
    /// `HashError::EmptyPassword` if the password is empty.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::HashFailed(e.to_string()))
    }

    /// Verify a password against a stored hash record
    ///
    /// Recomputes the hash with the salt and parameters embedded in the
    /// record and compares in constant time. A mismatch is `Ok(false)`,
    /// never an error.
    ///
    /// # Errors
    ///
    /// `HashError::Malformed` only when the stored record cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| HashError::Malformed)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(HashError::Malformed),
        }
    }
}
