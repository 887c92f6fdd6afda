//! Integration tests for the authenticated request engine

use super::*;
use integrations_omada::errors::AuthenticationError;
use integrations_omada::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_token_is_fetched_once_and_reused() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .and(header("Authorization", "AccessToken=AT-1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "totalRows": 1,
            "data": [{"siteId": "s1", "name": "HQ"}]
        }))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.sites().list().await.unwrap().len(), 1);
    assert_eq!(client.sites().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_token_request_body() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .and(body_json(json!({
            "omadacId": CONTROLLER_ID,
            "client_id": "client-abc",
            "client_secret": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": "AT-1",
            "expiresIn": 7200
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("sites/s1/devices/AA-BB-CC-DD-EE-01")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({"mac": "AA-BB-CC-DD-EE-01"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let device = client(&server)
        .devices()
        .get("s1", "AA-BB-CC-DD-EE-01")
        .await
        .unwrap();
    assert_eq!(device.mac, "AA-BB-CC-DD-EE-01");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;
    mount_token(&server, "AT-2", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites/s1/devices/AA-BB-CC-DD-EE-01")))
        .and(header("Authorization", "AccessToken=AT-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_envelope(-44112, "The access token has expired.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("sites/s1/devices/AA-BB-CC-DD-EE-01")))
        .and(header("Authorization", "AccessToken=AT-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "mac": "AA-BB-CC-DD-EE-01",
            "name": "Lobby AP"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let device = client(&server)
        .devices()
        .get("s1", "AA-BB-CC-DD-EE-01")
        .await
        .unwrap();
    assert_eq!(device.name.as_deref(), Some("Lobby AP"));
}

#[tokio::test]
async fn test_persistent_rejection_stops_after_two_attempts() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;
    mount_token(&server, "AT-2", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_envelope(-1, "Invalid access token, please login again.")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server).sites().list().await.unwrap_err();
    match err {
        OmadaError::Authentication(AuthenticationError::Rejected { path, reason }) => {
            assert_eq!(path, api_path("sites"));
            assert!(reason.contains("invalid access token"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_without_envelope_is_refreshed() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;
    mount_token(&server, "AT-2", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .and(header("Authorization", "AccessToken=AT-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .and(header("Authorization", "AccessToken=AT-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"data": []}))))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).sites().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_error_is_not_retried() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites/missing/clients")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(error_envelope(-33004, "Site not exist.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).clients().list("missing").await.unwrap_err();
    assert_eq!(err.error_code(), Some(-33004));
    assert!(!err.is_authentication());
}

#[tokio::test]
async fn test_server_error_status_is_not_retried() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).sites().list().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({"data": []})))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_builder(&server)
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let err = client.sites().list().await.unwrap_err();
    assert!(err.is_transient(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_rejected_credentials_send_no_api_call() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_envelope(
            -44106,
            "The client id or client secret is invalid.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"data": []}))))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).sites().list().await.unwrap_err();
    assert!(matches!(
        err,
        OmadaError::Authentication(AuthenticationError::CredentialsRejected { code: -44106, .. })
    ));
}

#[tokio::test]
async fn test_custom_call_through_executor() {
    let server = setup_mock_server().await;

    Mock::given(method("PATCH"))
        .and(path(api_path("sites/s1")))
        .and(header("Authorization", "AccessToken=AT-static"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Branch"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errorCode": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = OmadaClient::builder()
        .base_url(server.uri())
        .controller_id(CONTROLLER_ID)
        .auth_provider(StaticTokenProvider::new("AT-static"))
        .build()
        .unwrap();

    let descriptor = RequestDescriptor::patch(api_path("sites/s1"))
        .json(&json!({"name": "Branch"}))
        .unwrap();
    client
        .executor()
        .execute::<()>(&descriptor)
        .await
        .unwrap();
}
