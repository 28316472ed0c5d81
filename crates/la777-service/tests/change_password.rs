//! Password change integration tests against a mocked identity provider.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> serde_json::Value {
    json!({
        "email": "casey@la777.test",
        "currentPassword": "old-secret",
        "newPassword": "new-secret"
    })
}

#[tokio::test]
async fn change_password_success() {
    let identity = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(json!({
            "email": "casey@la777.test",
            "password": "old-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "idToken": "id-token-1",
            "localId": "uid-casey"
        })))
        .expect(1)
        .mount(&identity)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({
            "idToken": "id-token-1",
            "password": "new-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "localId": "uid-casey" })))
        .expect(1)
        .mount(&identity)
        .await;

    let harness = TestHarness::with_identity(&identity.uri());

    let response = harness
        .server
        .post("/api/change-password")
        .json(&request())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Password updated successfully");
}

#[tokio::test]
async fn wrong_current_password_is_rejected() {
    let identity = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
        })))
        .mount(&identity)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&identity)
        .await;

    let harness = TestHarness::with_identity(&identity.uri());

    let response = harness
        .server
        .post("/api/change-password")
        .json(&request())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn short_password_never_reaches_identity() {
    let identity = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&identity)
        .await;

    let harness = TestHarness::with_identity(&identity.uri());

    let response = harness
        .server
        .post("/api/change-password")
        .json(&json!({
            "email": "casey@la777.test",
            "currentPassword": "old-secret",
            "newPassword": "abc"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/change-password")
        .json(&json!({ "email": "casey@la777.test" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unconfigured_identity_is_a_server_error() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/change-password")
        .json(&request())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
