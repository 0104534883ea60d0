//! HTTP request and response bodies

use serde::{Deserialize, Serialize};

/// Request body for the register and login endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    /// Username (trimmed before use)
    #[serde(default)]
    pub username: String,

    /// Raw password
    #[serde(default)]
    pub password: String,
}

/// Response body for the register endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Response body for the login endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
