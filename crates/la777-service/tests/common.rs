//! Common test utilities for la777 integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;

use la777_core::StaffRole;
use la777_service::{create_router, AppState, ServiceConfig, StaffClaims};
use la777_store::RocksStore;

/// Secret used to sign test tokens.
pub const JWT_SECRET: &str = "test-jwt-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a harness whose identity provider lives at `url`.
    pub fn with_identity(url: &str) -> Self {
        Self::build(Some(url))
    }

    fn build(identity_url: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: Some(JWT_SECRET.into()),
            identity_api_url: identity_url.unwrap_or("http://localhost").into(),
            identity_api_key: identity_url.map(|_| "test-api-key".to_string()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            inactivity_window_seconds: 300,
            sweep_interval_seconds: 0,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Authorization header for a staff member with the given role.
    pub fn bearer(&self, role: StaffRole) -> HeaderValue {
        let (sub, name) = match role {
            StaffRole::Cashier => ("staff-cashier", "Casey"),
            StaffRole::Agent => ("staff-agent", "Avery"),
            StaffRole::Admin => ("staff-admin", "Alex"),
            StaffRole::SuperAdmin => ("staff-root", "Robin"),
        };
        Self::bearer_for(sub, name, role)
    }

    /// Authorization header for an arbitrary staff identity.
    pub fn bearer_for(sub: &str, name: &str, role: StaffRole) -> HeaderValue {
        let now = chrono::Utc::now().timestamp();
        let claims = StaffClaims {
            sub: sub.into(),
            name: name.into(),
            role,
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("Failed to sign token");
        HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid header value")
    }

    /// Create a game and return its JSON.
    pub async fn create_game(&self, name: &str, balance_cents: i64) -> Value {
        let response = self
            .server
            .post("/v1/games")
            .add_header(
                axum::http::header::AUTHORIZATION,
                self.bearer(StaffRole::Admin),
            )
            .json(&json!({ "name": name, "balance_cents": balance_cents }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Create a player and return its JSON.
    pub async fn create_player(&self, name: &str, referred_by: Option<&str>) -> Value {
        let response = self
            .server
            .post("/v1/players")
            .add_header(
                axum::http::header::AUTHORIZATION,
                self.bearer(StaffRole::Cashier),
            )
            .json(&json!({
                "name": name,
                "facebook_url": format!("https://facebook.com/{}", name.to_lowercase()),
                "referred_by": referred_by,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Attach a gaming account and return the updated player JSON.
    pub async fn add_account(&self, player_id: &str, game_name: &str, gamer_id: &str) -> Value {
        let response = self
            .server
            .post(&format!("/v1/players/{player_id}/gaming-accounts"))
            .add_header(
                axum::http::header::AUTHORIZATION,
                self.bearer(StaffRole::Cashier),
            )
            .json(&json!({ "game_name": game_name, "gamer_id": gamer_id }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Record a deposit as a cashier and return the ledger entry JSON.
    pub async fn deposit(&self, player_id: &str, game_name: &str, amount_cents: i64) -> Value {
        let response = self
            .server
            .post("/v1/transactions/deposit")
            .add_header(
                axum::http::header::AUTHORIZATION,
                self.bearer(StaffRole::Cashier),
            )
            .json(&json!({
                "player_id": player_id,
                "game_name": game_name,
                "amount_cents": amount_cents,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Fetch a JSON resource as an admin.
    pub async fn get_json(&self, path: &str) -> Value {
        let response = self
            .server
            .get(path)
            .add_header(
                axum::http::header::AUTHORIZATION,
                self.bearer(StaffRole::Admin),
            )
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON field as a string id.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("missing id").to_string()
}
