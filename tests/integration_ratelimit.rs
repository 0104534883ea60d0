//! Rate limiting integration tests
//!
//! Tests the token bucket gate in front of the login endpoint:
//! - 429 responses with retry-after headers once a client's budget is spent
//! - Remaining-token headers on admitted requests
//! - Registration remaining unthrottled

mod common;

use common::*;
use login_guard::server::router::{REMAINING_HEADER, RETRY_AFTER_HEADER};
use reqwest::StatusCode;

/// Test 1: Login attempts beyond capacity return 429 with a retry-after hint
#[tokio::test]
async fn test_login_rate_limited_after_capacity() {
    let addr = spawn_test_server(no_refill_bucket(3)).await;
    let client = reqwest::Client::new();
    let login_url = format!("http://{}/login", addr);
    let body = credentials_body("alice", "secret1");

    // Three admitted attempts (all 401: the user does not exist)
    for _ in 0..3 {
        let response = client.post(&login_url).json(&body).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The fourth is rejected before reaching the auth service
    let response = client.post(&login_url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .headers()
        .get(RETRY_AFTER_HEADER)
        .expect("retry-after header missing")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0);
}

/// Test 2: Admitted responses carry a decreasing remaining-token header
#[tokio::test]
async fn test_remaining_tokens_header_counts_down() {
    let addr = spawn_test_server(no_refill_bucket(3)).await;
    let client = reqwest::Client::new();
    let login_url = format!("http://{}/login", addr);
    let body = credentials_body("alice", "secret1");

    for expected in [2u64, 1, 0] {
        let response = client.post(&login_url).json(&body).send().await.unwrap();
        let remaining: u64 = response
            .headers()
            .get(REMAINING_HEADER)
            .expect("remaining header missing")
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(remaining, expected);
    }
}

/// Test 3: A throttled client can still register and later log in
#[tokio::test]
async fn test_registration_unaffected_by_throttle() {
    let addr = spawn_test_server(no_refill_bucket(1)).await;
    let client = reqwest::Client::new();
    let body = credentials_body("alice", "secret1");

    // Spend the single login token and confirm the throttle
    client
        .post(format!("http://{}/login", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    let response = client
        .post(format!("http://{}/login", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Registration bypasses the gate
    let response = client
        .post(format!("http://{}/register", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Test 4: Invalid login bodies are answered 400 without spending tokens
#[tokio::test]
async fn test_bad_request_does_not_consume_tokens() {
    let addr = spawn_test_server(no_refill_bucket(1)).await;
    let client = reqwest::Client::new();
    let login_url = format!("http://{}/login", addr);

    for _ in 0..5 {
        let response = client
            .post(&login_url)
            .json(&serde_json::json!({ "username": "alice" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // The budget is still intact
    let response = client
        .post(&login_url)
        .json(&credentials_body("alice", "secret1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test 5: Concurrent logins from one client never exceed the budget
#[tokio::test]
async fn test_concurrent_logins_bounded_by_capacity() {
    let addr = spawn_test_server(no_refill_bucket(5)).await;
    let client = reqwest::Client::new();
    let login_url = format!("http://{}/login", addr);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let url = login_url.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(&url)
                .json(&credentials_body("alice", "secret1"))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut admitted = 0;
    let mut throttled = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::UNAUTHORIZED => admitted += 1,
            StatusCode::TOO_MANY_REQUESTS => throttled += 1,
            other => panic!("Unexpected status: {}", other),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(throttled, 15);
}
