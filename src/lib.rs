//! login-guard - A rate-limited credential registration and authentication service
//!
//! This crate registers username/password credentials, stores them as salted
//! Argon2id hashes, verifies login attempts against the stored hashes, and
//! throttles login traffic per client IP with a greedy-refill token bucket.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod server;
pub mod store;
