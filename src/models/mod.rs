//! Domain models for login-guard
//!
//! This module contains the core domain models used throughout the application.

pub mod api;
pub mod credential;

// Re-export commonly used types
pub use api::{CredentialsRequest, HealthResponse, LoginResponse, RegisterResponse};
pub use credential::Credential;
