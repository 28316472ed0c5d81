//! Player handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use la777_core::{GamingAccount, Player, PlayerId, PlayerStatus, StaffRole, Transaction};
use la777_store::{Store, TransactionFilter};

use super::{parse_id, Pagination};
use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create player request.
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    /// Display name.
    pub name: String,
    /// Facebook profile URL.
    pub facebook_url: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Name of the referring player.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// Create a player with zeroed stats.
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    auth.require(StaffRole::Cashier)?;

    let mut player = Player::new(body.name, body.facebook_url, body.referred_by)?;
    player.avatar_url = non_blank(body.avatar_url);
    state.store.create_player(&player)?;

    tracing::info!(player_id = %player.id, name = %player.name, staff = %auth.name, "Player created");
    Ok((StatusCode::CREATED, Json(player)))
}

/// Player list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListPlayersQuery {
    /// Only players in this status.
    #[serde(default)]
    pub status: Option<PlayerStatus>,
    /// Case-insensitive substring of the name.
    #[serde(default)]
    pub search: Option<String>,
}

/// List players ordered by name.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Query(query): Query<ListPlayersQuery>,
) -> Result<Json<Vec<Player>>, ApiError> {
    auth.require(StaffRole::Cashier)?;

    let needle = query.search.as_deref().map(str::to_lowercase);
    let players = state
        .store
        .list_players()?
        .into_iter()
        .filter(|p| query.status.map_or(true, |s| p.status == s))
        .filter(|p| {
            needle
                .as_deref()
                .map_or(true, |n| p.name.to_lowercase().contains(n))
        })
        .collect();

    Ok(Json(players))
}

/// Get a player.
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let player = state
        .store
        .get_player(&player_id)?
        .ok_or_else(|| ApiError::NotFound(format!("player not found: {player_id}")))?;

    Ok(Json(player))
}

/// Profile update request. Absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New profile URL.
    #[serde(default)]
    pub facebook_url: Option<String>,
    /// New avatar URL; empty clears it.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// New referrer name; empty clears it.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// Update a player's profile.
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<UpdatePlayerRequest>,
) -> Result<Json<Player>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let player = state.store.update_player(&player_id, &mut |p| {
        if let Some(name) = &body.name {
            p.set_name(name.as_str())?;
        }
        if let Some(url) = &body.facebook_url {
            p.set_facebook_url(url.as_str())?;
        }
        if let Some(avatar) = &body.avatar_url {
            p.avatar_url = non_blank(Some(avatar.clone()));
        }
        if let Some(referrer) = &body.referred_by {
            p.referred_by = non_blank(Some(referrer.clone()));
        }
        Ok(())
    })?;

    tracing::info!(player_id = %player_id, staff = %auth.name, "Player updated");
    Ok(Json(player))
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct SetPlayerStatusRequest {
    /// New status.
    pub status: PlayerStatus,
}

/// Set a player's status.
pub async fn set_player_status(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<SetPlayerStatusRequest>,
) -> Result<Json<Player>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let player = state.store.update_player(&player_id, &mut |p| {
        p.status = body.status;
        Ok(())
    })?;

    tracing::info!(player_id = %player_id, status = ?body.status, staff = %auth.name, "Player status changed");
    Ok(Json(player))
}

/// Add gaming account request.
#[derive(Debug, Deserialize)]
pub struct AddGamingAccountRequest {
    /// Game the account is on. Must name an existing game.
    pub game_name: String,
    /// The player's id on that game.
    pub gamer_id: String,
}

/// Attach a gaming account to a player.
pub async fn add_gaming_account(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<AddGamingAccountRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let account = GamingAccount {
        game_name: body.game_name.trim().to_string(),
        gamer_id: body.gamer_id.trim().to_string(),
    };
    let game_name = account.game_name.clone();
    let player = state.store.add_gaming_account(&player_id, account)?;

    tracing::info!(player_id = %player_id, game = %game_name, "Gaming account added");
    Ok((StatusCode::CREATED, Json(player)))
}

/// Remove a player's gaming account on a game.
pub async fn remove_gaming_account(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path((id, game_name)): Path<(String, String)>,
) -> Result<Json<Player>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let player = state.store.remove_gaming_account(&player_id, &game_name)?;

    tracing::info!(player_id = %player_id, game = %game_name, "Gaming account removed");
    Ok(Json(player))
}

/// Paginated ledger entries.
#[derive(Debug, Serialize)]
pub struct TransactionPage {
    /// Entries, newest first.
    pub transactions: Vec<Transaction>,
    /// Whether there are more entries.
    pub has_more: bool,
}

/// List a player's ledger entries.
pub async fn list_player_transactions(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<TransactionPage>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    if state.store.get_player(&player_id)?.is_none() {
        return Err(ApiError::NotFound(format!("player not found: {player_id}")));
    }

    let filter = TransactionFilter {
        player_id: Some(player_id),
        ..TransactionFilter::default()
    };
    // Fetch one more than requested to determine has_more
    let limit = page.limit();
    let mut transactions = state
        .store
        .list_transactions(&filter, limit + 1, page.offset)?;
    let has_more = transactions.len() > limit;
    transactions.truncate(limit);

    Ok(Json(TransactionPage {
        transactions,
        has_more,
    }))
}

/// A player referred by another, with payout eligibility.
#[derive(Debug, Serialize)]
pub struct ReferralEntry {
    /// Referred player id.
    pub player_id: PlayerId,
    /// Referred player name.
    pub name: String,
    /// Referred player's total deposits.
    pub t_deposit_cents: i64,
    /// Whether a bonus has already been paid for this player.
    pub paid: bool,
    /// Whether a bonus can be paid now.
    pub eligible: bool,
}

/// List the players who name this player as their referrer.
pub async fn list_referrals(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReferralEntry>>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let player_id: PlayerId = parse_id(&id)?;

    let referrer = state
        .store
        .get_player(&player_id)?
        .ok_or_else(|| ApiError::NotFound(format!("player not found: {player_id}")))?;

    let mut entries = Vec::new();
    for referred in state.store.list_players()? {
        if referred.id == referrer.id || referred.referred_by.as_deref() != Some(referrer.name.as_str()) {
            continue;
        }
        let paid = state.store.has_referral_payout(&referrer.id, &referred.id)?;
        entries.push(ReferralEntry {
            player_id: referred.id,
            name: referred.name,
            t_deposit_cents: referred.stats.t_deposit_cents,
            paid,
            eligible: !paid && referred.stats.t_deposit_cents > 0,
        });
    }

    Ok(Json(entries))
}

/// Sweep result.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    /// Players moved to inactive.
    pub marked_inactive: Vec<PlayerId>,
}

/// Run the inactivity sweep now.
pub async fn sweep_inactive(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
) -> Result<Json<SweepResponse>, ApiError> {
    auth.require(StaffRole::Cashier)?;

    let marked_inactive = state
        .store
        .mark_inactive_players(Utc::now(), state.config.inactivity_window())?;

    Ok(Json(SweepResponse { marked_inactive }))
}

/// Bulk delete request.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    /// Players to delete.
    pub ids: Vec<String>,
}

/// Bulk delete response.
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    /// Number of players deleted.
    pub deleted_players: usize,
    /// Number of ledger entries removed with them.
    pub deleted_transactions: usize,
}

/// Delete players together with their ledger entries.
pub async fn bulk_delete(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    auth.require(StaffRole::Admin)?;

    if body.ids.is_empty() {
        return Err(ApiError::BadRequest("no player ids given".into()));
    }
    let mut ids = body
        .ids
        .iter()
        .map(|raw| parse_id::<PlayerId>(raw))
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_by_key(|id| *id.as_bytes());
    ids.dedup();

    let deleted_transactions = state.store.delete_players(&ids)?;

    tracing::info!(
        players = ids.len(),
        transactions = deleted_transactions,
        staff = %auth.name,
        "Players bulk deleted"
    );
    Ok(Json(BulkDeleteResponse {
        deleted_players: ids.len(),
        deleted_transactions,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
