//! Integration tests using WireMock
//!
//! These tests drive the full stack against a mock controller: the reqwest
//! transport, the client-credentials token provider, the request engine
//! and the typed services.

pub mod pagination;
pub mod request_engine;

use integrations_omada::{OmadaClient, OmadaClientBuilder};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Controller ID used by every test.
pub const CONTROLLER_ID: &str = "cid-123";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Builder pointing at the mock server with client credentials.
pub fn client_builder(server: &MockServer) -> OmadaClientBuilder {
    OmadaClient::builder()
        .base_url(server.uri())
        .controller_id(CONTROLLER_ID)
        .client_credentials("client-abc", SecretString::new("s3cret".to_string()))
        .timeout(Duration::from_secs(5))
}

/// Client pointing at the mock server.
pub fn client(server: &MockServer) -> OmadaClient {
    client_builder(server)
        .build()
        .expect("Failed to build client")
}

/// Absolute path below `/openapi/v1/{omadacId}`.
pub fn api_path(rest: &str) -> String {
    format!("/openapi/v1/{}/{}", CONTROLLER_ID, rest)
}

/// Successful envelope around `result`.
pub fn envelope(result: Value) -> Value {
    json!({"errorCode": 0, "msg": "Success.", "result": result})
}

/// Error envelope.
pub fn error_envelope(code: i64, msg: &str) -> Value {
    json!({"errorCode": code, "msg": msg})
}

/// Mounts a token endpoint answering `times` requests with `token`.
pub async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": token,
            "tokenType": "bearer",
            "expiresIn": 7200,
            "refreshToken": "RT-unused"
        }))))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}
