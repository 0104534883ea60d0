//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use login_guard::auth::{AuthService, PasswordHasher};
use login_guard::ratelimit::{BucketConfig, RateLimitGate};
use login_guard::server::{build_router, AppState};
use login_guard::store::MemoryStore;

/// Cheap hasher for tests; the work factor only needs to be valid
pub fn create_test_hasher() -> PasswordHasher {
    PasswordHasher::new(1).expect("Failed to create test hasher")
}

/// Create an auth service over a fresh in-memory store
pub fn create_test_service() -> Arc<AuthService<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());
    Arc::new(AuthService::new(store, create_test_hasher()).expect("Failed to create auth service"))
}

/// Bucket parameters that effectively never refill within a test
pub fn no_refill_bucket(capacity: u64) -> BucketConfig {
    BucketConfig {
        capacity,
        refill_rate: 1,
        refill_period: Duration::from_secs(3600),
    }
}

/// Create application state with the given bucket parameters
pub fn create_test_state(bucket: BucketConfig) -> AppState<MemoryStore> {
    AppState {
        auth: create_test_service(),
        gate: Arc::new(RateLimitGate::new(bucket)),
    }
}

/// Spawn the HTTP server on an OS-assigned port and return its address
pub async fn spawn_test_server(bucket: BucketConfig) -> SocketAddr {
    let state = create_test_state(bucket);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });

    addr
}

/// JSON body for the register and login endpoints
pub fn credentials_body(username: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "username": username, "password": password })
}
