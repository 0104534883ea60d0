//! Authentication components for login-guard
//!
//! This module provides password hashing and the register/login use-cases.

pub mod password;
pub mod service;

pub use password::PasswordHasher;
pub use service::{AuthService, RegisterOutcome, RejectReason};
