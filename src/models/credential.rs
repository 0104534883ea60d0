//! Credential domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user credential
///
/// Exactly one credential exists per username. Credentials are created once
/// at registration, are immutable afterwards, and are never deleted. The raw
/// password is never stored; only its Argon2id hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Trimmed, non-empty username acting as the unique key
    pub username: String,

    /// Salted password hash (argon2id, PHC format)
    pub password_hash: String,

    /// When the credential was registered
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Credential::new stores the given fields
    #[test]
    fn test_credential_new() {
        let cred = Credential::new("alice", "$argon2id$fakehash");
        assert_eq!(cred.username, "alice");
        assert_eq!(cred.password_hash, "$argon2id$fakehash");
        assert!(cred.created_at <= Utc::now());
    }

    // Test 2: Serialization round-trip
    #[test]
    fn test_credential_serde_roundtrip() {
        let cred = Credential::new("bob", "$argon2id$other");
        let json = serde_json::to_string(&cred).unwrap();
        let parsed: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(cred, parsed);
    }
}
