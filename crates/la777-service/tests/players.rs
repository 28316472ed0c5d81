//! Player management integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{id_of, TestHarness};
use serde_json::json;

use la777_core::StaffRole;

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn create_player_starts_active_with_zero_stats() {
    let harness = TestHarness::new();

    let player = harness.create_player("Jordan", None).await;

    assert_eq!(player["name"], "Jordan");
    assert_eq!(player["status"], "active");
    assert_eq!(player["stats"]["t_deposit_cents"], 0);
    assert_eq!(player["gaming_accounts"], json!([]));
}

#[tokio::test]
async fn create_player_rejects_bad_profile_url() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/players")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "name": "Jordan", "facebook_url": "facebook" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn list_players_filters_by_search_and_status() {
    let harness = TestHarness::new();
    harness.create_player("Jordan", None).await;
    let quinn = harness.create_player("Quinn", None).await;
    harness.create_player("Jody", None).await;

    let body = harness.get_json("/v1/players?search=jo").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    harness
        .server
        .put(&format!("/v1/players/{}/status", id_of(&quinn)))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "status": "inactive" }))
        .await
        .assert_status_ok();

    let body = harness.get_json("/v1/players?status=inactive").await;
    let players = body.as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["name"], "Quinn");
}

#[tokio::test]
async fn update_player_changes_only_given_fields() {
    let harness = TestHarness::new();
    let player = harness.create_player("Jordan", Some("Riley")).await;

    let response = harness
        .server
        .patch(&format!("/v1/players/{}", id_of(&player)))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "name": "Jordan K", "avatar_url": "https://cdn.la777.test/j.png" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Jordan K");
    assert_eq!(body["avatar_url"], "https://cdn.la777.test/j.png");
    assert_eq!(body["referred_by"], "Riley");
}

#[tokio::test]
async fn get_unknown_player_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/players/7f8d2c3e-0000-4000-8000-000000000000")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_player_id_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/players/not-a-uuid")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Gaming Accounts
// ============================================================================

#[tokio::test]
async fn gaming_accounts_are_unique_per_game() {
    let harness = TestHarness::new();
    harness.create_game("Orion Stars", 0).await;
    let player = harness.create_player("Jordan", None).await;
    let id = id_of(&player);

    let updated = harness.add_account(&id, "Orion Stars", "jordan01").await;
    assert_eq!(updated["gaming_accounts"][0]["gamer_id"], "jordan01");

    let response = harness
        .server
        .post(&format!("/v1/players/{id}/gaming-accounts"))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "game_name": "Orion Stars", "gamer_id": "jordan02" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn gaming_account_needs_existing_game() {
    let harness = TestHarness::new();
    let player = harness.create_player("Jordan", None).await;

    let response = harness
        .server
        .post(&format!("/v1/players/{}/gaming-accounts", id_of(&player)))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "game_name": "Nowhere", "gamer_id": "x" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_gaming_account() {
    let harness = TestHarness::new();
    harness.create_game("Juwa", 0).await;
    let player = harness.create_player("Jordan", None).await;
    let id = id_of(&player);
    harness.add_account(&id, "Juwa", "j-1").await;

    let response = harness
        .server
        .delete(&format!("/v1/players/{id}/gaming-accounts/Juwa"))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["gaming_accounts"], json!([]));

    harness
        .server
        .delete(&format!("/v1/players/{id}/gaming-accounts/Juwa"))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // A miss leaves the record untouched
    let after = harness.get_json(&format!("/v1/players/{id}")).await;
    assert_eq!(after["updated_at"], body["updated_at"]);
}

// ============================================================================
// Referrals
// ============================================================================

#[tokio::test]
async fn referrals_become_eligible_after_first_deposit() {
    let harness = TestHarness::new();
    harness.create_game("Juwa", 100_000).await;
    let riley = harness.create_player("Riley", None).await;
    let jordan = harness.create_player("Jordan", Some("Riley")).await;
    harness.create_player("Quinn", None).await;

    let path = format!("/v1/players/{}/referrals", id_of(&riley));
    let body = harness.get_json(&path).await;
    let referrals = body.as_array().unwrap();
    assert_eq!(referrals.len(), 1);
    assert_eq!(referrals[0]["name"], "Jordan");
    assert_eq!(referrals[0]["eligible"], false);

    harness.deposit(&id_of(&jordan), "Juwa", 2_000).await;

    let body = harness.get_json(&path).await;
    assert_eq!(body[0]["t_deposit_cents"], 2_000);
    assert_eq!(body[0]["eligible"], true);
    assert_eq!(body[0]["paid"], false);
}

#[tokio::test]
async fn renaming_a_referrer_keeps_their_referrals() {
    let harness = TestHarness::new();
    harness.create_game("Juwa", 100_000).await;
    let riley = harness.create_player("Riley", None).await;
    let jordan = harness.create_player("Jordan", Some("Riley")).await;
    harness.deposit(&id_of(&jordan), "Juwa", 2_000).await;

    harness
        .server
        .patch(&format!("/v1/players/{}", id_of(&riley)))
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "name": "Riley Stone" }))
        .await
        .assert_status_ok();

    let jordan_now = harness
        .get_json(&format!("/v1/players/{}", id_of(&jordan)))
        .await;
    assert_eq!(jordan_now["referred_by"], "Riley Stone");

    let body = harness
        .get_json(&format!("/v1/players/{}/referrals", id_of(&riley)))
        .await;
    assert_eq!(body[0]["name"], "Jordan");
    assert_eq!(body[0]["eligible"], true);

    harness
        .server
        .post("/v1/transactions/referral")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({
            "player_id": id_of(&riley),
            "referred_id": id_of(&jordan),
            "game_name": "Juwa",
            "amount_cents": 500
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

// ============================================================================
// Sweep And Bulk Delete
// ============================================================================

#[tokio::test]
async fn sweep_leaves_recent_players_active() {
    let harness = TestHarness::new();
    harness.create_player("Jordan", None).await;

    let response = harness
        .server
        .post("/v1/players/sweep-inactive")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["marked_inactive"], json!([]));
}

#[tokio::test]
async fn bulk_delete_removes_players_and_their_ledger() {
    let harness = TestHarness::new();
    harness.create_game("Juwa", 100_000).await;
    let jordan = harness.create_player("Jordan", None).await;
    let quinn = harness.create_player("Quinn", None).await;
    harness.deposit(&id_of(&jordan), "Juwa", 1_000).await;
    harness.deposit(&id_of(&jordan), "Juwa", 500).await;
    harness.deposit(&id_of(&quinn), "Juwa", 700).await;

    let response = harness
        .server
        .post("/v1/players/bulk-delete")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .json(&json!({ "ids": [id_of(&jordan)] }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted_players"], 1);
    assert_eq!(body["deleted_transactions"], 2);

    let players = harness.get_json("/v1/players").await;
    assert_eq!(players.as_array().unwrap().len(), 1);
    let ledger = harness.get_json("/v1/transactions").await;
    assert_eq!(ledger["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_delete_requires_admin() {
    let harness = TestHarness::new();
    let jordan = harness.create_player("Jordan", None).await;

    let response = harness
        .server
        .post("/v1/players/bulk-delete")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Cashier))
        .json(&json!({ "ids": [id_of(&jordan)] }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_delete_with_unknown_id_deletes_nothing() {
    let harness = TestHarness::new();
    let jordan = harness.create_player("Jordan", None).await;

    let response = harness
        .server
        .post("/v1/players/bulk-delete")
        .add_header(AUTHORIZATION, harness.bearer(StaffRole::Admin))
        .json(&json!({ "ids": [id_of(&jordan), "7f8d2c3e-0000-4000-8000-000000000000"] }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let players = harness.get_json("/v1/players").await;
    assert_eq!(players.as_array().unwrap().len(), 1);
}
