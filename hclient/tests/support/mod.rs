//! Shared fixtures for integration tests against a mock platform

#![allow(dead_code)]

use std::time::Duration;

use hclient::{Config, HClient};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "app-id";
pub const CLIENT_SECRET: &str = "app-secret";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config(server: &MockServer) -> Config {
    Config::new(server.uri(), CLIENT_ID, CLIENT_SECRET)
}

pub fn client(server: &MockServer) -> HClient {
    init_logging();
    HClient::new(config(server)).expect("valid test config")
}

pub fn token_response(token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": expires_in,
    }))
}

/// Identity endpoint mock matching the configured client credentials
pub fn token_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth(CLIENT_ID, CLIENT_SECRET))
        .and(body_string_contains("grant_type=client_credentials"))
}

/// Mount an identity endpoint that always issues `token`
pub async fn mount_token(server: &MockServer, token: &str, expected_fetches: u64) {
    token_mock()
        .respond_with(token_response(token, 3600))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

/// Identity endpoint that answers slowly, so concurrent callers overlap
pub async fn mount_slow_token(
    server: &MockServer,
    token: &str,
    delay: Duration,
    expected_fetches: u64,
) {
    token_mock()
        .respond_with(token_response(token, 3600).set_delay(delay))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
