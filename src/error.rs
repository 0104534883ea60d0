//! Application error types for login-guard
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.
//!
//! User-input failures (empty fields, wrong passwords, duplicate usernames)
//! are never surfaced through these types; they resolve to enum or boolean
//! results in the auth layer. The errors here cover environment-level
//! problems: misconfigured hashing parameters and storage backend failures.

use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HashError {
    /// Empty password passed to the hasher
    #[error("Password must not be empty")]
    EmptyPassword,

    /// Stored hash record could not be parsed
    #[error("Malformed password hash record")]
    Malformed,

    /// Hashing parameters rejected by the algorithm
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Underlying algorithm failed
    #[error("Password hashing failed: {0}")]
    HashFailed(String),
}

/// Credential storage errors
///
/// The in-memory store never fails, but the trait allows durable backends
/// that can.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Application-level error type
///
/// Aggregates all domain-specific error types. Errors that reach this level
/// indicate a misconfigured deployment and abort startup rather than failing
/// per-request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Password hashing error
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
