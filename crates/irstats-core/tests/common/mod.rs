//! Shared helpers for the wiremock-backed integration tests
#![allow(dead_code)]

use irstats_core::{Client, ClientOption};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_PATH: &str = "/membersite/Login";
pub const SESSION_TOKEN: &str = "a1b2c3d4";

/// Route test logs through the test writer; RUST_LOG overrides the level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Client for alice/secret pointed at the mock server
pub fn client_for(server: &MockServer) -> Client {
    client_with(server, Vec::new())
}

pub fn client_with(server: &MockServer, mut options: Vec<ClientOption>) -> Client {
    init_tracing();
    options.insert(0, ClientOption::BaseUrl(server.uri()));
    Client::new("alice", "secret", options).expect("Failed to create client")
}

/// Login endpoint that answers with the given Set-Cookie header
pub fn login_responding_with(set_cookie: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", set_cookie))
}

/// Login endpoint that issues a valid session cookie, expected `times` times
pub async fn mount_login(server: &MockServer, times: u64) {
    login_responding_with(&format!("{}={}; Path=/", irstats_core::SESSION_COOKIE, SESSION_TOKEN))
        .expect(times)
        .mount(server)
        .await;
}

/// (method, path) of every request the server saw, in arrival order
pub async fn request_log(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}
