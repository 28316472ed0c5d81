//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    games, health, password, payment_tags, players, reports, staff, transactions,
};
use crate::state::AppState;

/// Maximum concurrent requests for `/v1` endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /api/change-password` - Re-authenticate and change password
///
/// ## Players (cashier, bulk delete admin)
/// - `POST /v1/players`, `GET /v1/players`
/// - `GET|PATCH /v1/players/:id`, `PUT /v1/players/:id/status`
/// - `POST /v1/players/:id/gaming-accounts`
/// - `DELETE /v1/players/:id/gaming-accounts/:game_name`
/// - `GET /v1/players/:id/transactions`, `GET /v1/players/:id/referrals`
/// - `POST /v1/players/sweep-inactive`, `POST /v1/players/bulk-delete`
///
/// ## Games (read cashier, write admin)
/// - `GET|POST /v1/games`, `GET|PATCH|DELETE /v1/games/:id`
/// - `POST /v1/games/:id/recharge`
///
/// ## Transactions (cashier, reverse admin)
/// - `POST /v1/transactions/{deposit,withdraw,credit,referral}`
/// - `GET /v1/transactions`, `GET /v1/transactions/:id`
/// - `POST /v1/transactions/:id/reverse`
///
/// ## Payment tags (read cashier, write admin)
/// - `GET|POST /v1/payment-tags`, `PUT /v1/payment-tags/:id/status`,
///   `DELETE /v1/payment-tags/:id`
///
/// ## Staff (read admin, write super admin)
/// - `GET|POST /v1/staff`, `GET|DELETE /v1/staff/:id`,
///   `PUT /v1/staff/:id/role`, `PUT /v1/staff/:id/status`
///
/// ## Reports (agent)
/// - `GET /v1/reports/summary`
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Players
        .route(
            "/players",
            post(players::create_player).get(players::list_players),
        )
        .route("/players/sweep-inactive", post(players::sweep_inactive))
        .route("/players/bulk-delete", post(players::bulk_delete))
        .route(
            "/players/:id",
            get(players::get_player).patch(players::update_player),
        )
        .route("/players/:id/status", put(players::set_player_status))
        .route(
            "/players/:id/gaming-accounts",
            post(players::add_gaming_account),
        )
        .route(
            "/players/:id/gaming-accounts/:game_name",
            delete(players::remove_gaming_account),
        )
        .route(
            "/players/:id/transactions",
            get(players::list_player_transactions),
        )
        .route("/players/:id/referrals", get(players::list_referrals))
        // Games
        .route("/games", post(games::create_game).get(games::list_games))
        .route(
            "/games/:id",
            get(games::get_game)
                .patch(games::rename_game)
                .delete(games::delete_game),
        )
        .route("/games/:id/recharge", post(games::recharge_game))
        // Transactions
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/deposit", post(transactions::deposit))
        .route("/transactions/withdraw", post(transactions::withdraw))
        .route("/transactions/credit", post(transactions::credit))
        .route("/transactions/referral", post(transactions::referral))
        .route("/transactions/:id", get(transactions::get_transaction))
        .route(
            "/transactions/:id/reverse",
            post(transactions::reverse_transaction),
        )
        // Payment tags
        .route(
            "/payment-tags",
            post(payment_tags::create_payment_tag).get(payment_tags::list_payment_tags),
        )
        .route(
            "/payment-tags/:id",
            delete(payment_tags::delete_payment_tag),
        )
        .route(
            "/payment-tags/:id/status",
            put(payment_tags::set_payment_tag_status),
        )
        // Staff
        .route("/staff", post(staff::create_staff).get(staff::list_staff))
        .route(
            "/staff/:id",
            get(staff::get_staff).delete(staff::delete_staff),
        )
        .route("/staff/:id/role", put(staff::set_staff_role))
        .route("/staff/:id/status", put(staff::set_staff_status))
        // Reports
        .route("/reports/summary", get(reports::summary))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/change-password", post(password::change_password))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins. `*` allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins configured - cross-origin requests will be refused");
    }
    base.allow_origin(allowed)
}
