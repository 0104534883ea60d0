//! HTTP router for login-guard
//!
//! Routes:
//! - `POST /register` — create a credential (201 / 409 / 400)
//! - `POST /login` — verify a credential (200 / 401 / 400), rate limited
//!   per client IP (429 with a retry-after header on rejection)
//! - `GET /health` — liveness check
//!
//! Registration deliberately bypasses the rate limit gate; only login
//! attempts are throttled.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};

use crate::auth::{AuthService, RegisterOutcome};
use crate::models::{CredentialsRequest, HealthResponse, LoginResponse, RegisterResponse};
use crate::ratelimit::RateLimitGate;
use crate::store::CredentialStore;

/// Rate limit response headers, mirroring the values in `Admission`
pub const REMAINING_HEADER: &str = "X-Rate-Limit-Remaining";
pub const RETRY_AFTER_HEADER: &str = "X-Rate-Limit-Retry-After-Seconds";

/// Shared application state
pub struct AppState<S: CredentialStore> {
    /// Authentication service
    pub auth: Arc<AuthService<S>>,

    /// Login admission gate
    pub gate: Arc<RateLimitGate>,
}

impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            gate: Arc::clone(&self.gate),
        }
    }
}

/// Build the application router
pub fn build_router<S: CredentialStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(register_handler::<S>))
        .route("/login", post(login_handler::<S>))
        .with_state(state)
}

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Registration endpoint handler
async fn register_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    Json(body): Json<CredentialsRequest>,
) -> Response {
    match state.auth.register(&body.username, &body.password).await {
        Ok(RegisterOutcome::Created) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: format!(
                    "User '{}' registered successfully.",
                    body.username.trim()
                ),
            }),
        )
            .into_response(),
        Ok(RegisterOutcome::Conflict) => (
            StatusCode::CONFLICT,
            Json(RegisterResponse {
                message: format!("Username '{}' already exists.", body.username.trim()),
            }),
        )
            .into_response(),
        Ok(RegisterOutcome::Rejected(reason)) => (
            StatusCode::BAD_REQUEST,
            Json(RegisterResponse {
                message: reason.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RegisterResponse {
                    message: "Registration failed due to an internal error.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Login endpoint handler
///
/// Consults the rate limit gate before the credential check; a rejected
/// request never reaches the auth service.
async fn login_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<CredentialsRequest>,
) -> Response {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse {
                message: "Username and password required.".to_string(),
            }),
        )
            .into_response();
    }

    let client_key = addr.ip().to_string();
    let admission = state.gate.admit(&client_key);

    if !admission.allowed {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER_HEADER, admission.retry_after_secs.to_string())],
            Json(LoginResponse {
                message: "Too many requests".to_string(),
            }),
        )
            .into_response();
    }

    let remaining = [(REMAINING_HEADER, admission.remaining_tokens.to_string())];

    match state.auth.login(&body.username, &body.password).await {
        Ok(true) => (
            StatusCode::OK,
            remaining,
            Json(LoginResponse {
                message: format!("Login successful for user '{}'.", body.username.trim()),
            }),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::UNAUTHORIZED,
            remaining,
            Json(LoginResponse {
                message: "Login failed: Invalid username or password.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Login failed with storage error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                remaining,
                Json(LoginResponse {
                    message: "Login failed due to an internal error.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
