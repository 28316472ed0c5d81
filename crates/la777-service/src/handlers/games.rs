//! Game handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use la777_core::{Game, GameId, StaffRole};
use la777_store::Store;

use super::parse_id;
use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create game request.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// Unique game name.
    pub name: String,
    /// Opening balance in cents.
    #[serde(default)]
    pub balance_cents: i64,
}

/// Create a game.
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    auth.require(StaffRole::Admin)?;

    let game = Game::new(body.name, body.balance_cents)?;
    state.store.create_game(&game)?;

    Ok((StatusCode::CREATED, Json(game)))
}

/// List games ordered by name.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
) -> Result<Json<Vec<Game>>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    Ok(Json(state.store.list_games()?))
}

/// Get a game.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let game_id: GameId = parse_id(&id)?;

    let game = state
        .store
        .get_game(&game_id)?
        .ok_or_else(|| ApiError::NotFound(format!("game not found: {game_id}")))?;

    Ok(Json(game))
}

/// Rename request.
#[derive(Debug, Deserialize)]
pub struct RenameGameRequest {
    /// New unique name.
    pub name: String,
}

/// Result of a rename or delete.
#[derive(Debug, Serialize)]
pub struct CascadeResponse {
    /// The game after the change (before it, for deletes).
    pub game: Game,
    /// Players whose gaming accounts were rewritten.
    pub players_updated: usize,
}

/// Rename a game, rewriting every player's gaming account on it.
pub async fn rename_game(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<RenameGameRequest>,
) -> Result<Json<CascadeResponse>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let game_id: GameId = parse_id(&id)?;

    let outcome = state.store.rename_game(&game_id, &body.name)?;

    Ok(Json(CascadeResponse {
        game: outcome.game,
        players_updated: outcome.players_updated,
    }))
}

/// Delete a game and every player's gaming account on it.
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<CascadeResponse>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let game_id: GameId = parse_id(&id)?;

    let outcome = state.store.delete_game(&game_id)?;

    tracing::info!(game_id = %game_id, staff = %auth.name, "Game deleted via API");
    Ok(Json(CascadeResponse {
        game: outcome.game,
        players_updated: outcome.players_updated,
    }))
}

/// Recharge request.
#[derive(Debug, Deserialize)]
pub struct RechargeRequest {
    /// Amount to add, in cents.
    pub amount_cents: i64,
}

/// Top up a game's balance.
pub async fn recharge_game(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<RechargeRequest>,
) -> Result<Json<Game>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let game_id: GameId = parse_id(&id)?;

    let game = state
        .store
        .recharge_game(&game_id, body.amount_cents, &auth.name)?;

    Ok(Json(game))
}
