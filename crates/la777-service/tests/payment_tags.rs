//! Payment tag integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{id_of, TestHarness};
use serde_json::json;

use la777_core::StaffRole;

async fn create_tag(harness: &TestHarness, method: &str, tag: &str) -> serde_json::Value {
    let response = harness
        .server
        .post("/v1/payment-tags")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .json(&json!({ "payment_method": method, "tag": tag }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn list_filters_by_method_ignoring_case() {
    let harness = TestHarness::new();
    create_tag(&harness, "CashApp", "$la777one").await;
    create_tag(&harness, "CashApp", "$la777two").await;
    create_tag(&harness, "Venmo", "@la777").await;

    let response = harness
        .server
        .get("/v1/payment-tags")
        .add_query_param("payment_method", "cashapp")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn tag_must_carry_a_prefix() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/payment-tags")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .json(&json!({ "payment_method": "CashApp", "tag": "la777" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_change_and_delete() {
    let harness = TestHarness::new();
    let tag = create_tag(&harness, "CashApp", "$la777").await;
    let id = id_of(&tag);
    assert_eq!(tag["status"], "active");

    let response = harness
        .server
        .put(&format!("/v1/payment-tags/{id}/status"))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .json(&json!({ "status": "deactivated" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "deactivated");

    harness
        .server
        .delete(&format!("/v1/payment-tags/{id}"))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = harness.get_json("/v1/payment-tags").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn cashier_cannot_create_tags() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/payment-tags")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "payment_method": "CashApp", "tag": "$la777" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}
