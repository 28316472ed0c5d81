//! Balance transfer and ledger handlers.
//!
//! Every transfer endpoint builds a `TransferRequest` and hands it to the store,
//! which validates and applies it atomically. The recording staff name always
//! comes from the caller's token.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use la777_core::{
    validate_tag, CreditType, GameId, PlayerId, StaffRole, Transaction, TransactionId,
    TransactionStatus, TransactionType, TransferKind, TransferRequest,
};
use la777_store::{Store, TransactionFilter};

use super::players::TransactionPage;
use super::{parse_id, Pagination};
use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Fields shared by every transfer.
#[derive(Debug, Deserialize)]
pub struct TransferFields {
    /// Owning player.
    pub player_id: String,
    /// Game name.
    pub game_name: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Optional tip in cents.
    #[serde(default)]
    pub tip_cents: Option<i64>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Payment tag (`$cashtag` or `@handle`).
    #[serde(default)]
    pub payment_tag: Option<String>,
}

/// Deposit request.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Shared fields.
    #[serde(flatten)]
    pub transfer: TransferFields,
    /// Bonus percentage on top of the amount.
    #[serde(default)]
    pub bonus_percent: u32,
}

/// Credit request.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    /// Shared fields.
    #[serde(flatten)]
    pub transfer: TransferFields,
    /// Freeplay or bonusplay.
    pub credit: CreditType,
}

/// Referral bonus request. `player_id` is the referrer.
#[derive(Debug, Deserialize)]
pub struct ReferralRequest {
    /// Shared fields.
    #[serde(flatten)]
    pub transfer: TransferFields,
    /// The referred player.
    pub referred_id: String,
}

/// Record a deposit.
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<DepositRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let kind = TransferKind::Deposit {
        bonus_percent: body.bonus_percent,
    };
    apply(&state, &auth, body.transfer, kind)
}

/// Record a withdrawal.
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<TransferFields>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    apply(&state, &auth, body, TransferKind::Withdraw)
}

/// Record a freeplay or bonusplay credit.
pub async fn credit(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<CreditRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let kind = TransferKind::Credit {
        credit: body.credit,
    };
    apply(&state, &auth, body.transfer, kind)
}

/// Pay a referral bonus.
pub async fn referral(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<ReferralRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let kind = TransferKind::Referral {
        referred_id: parse_id(&body.referred_id)?,
    };
    apply(&state, &auth, body.transfer, kind)
}

fn apply(
    state: &AppState,
    auth: &StaffAuth,
    fields: TransferFields,
    kind: TransferKind,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    auth.require(StaffRole::Cashier)?;

    let payment_tag = fields
        .payment_tag
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(validate_tag)
        .transpose()?;

    let request = TransferRequest {
        player_id: parse_id(&fields.player_id)?,
        game_name: fields.game_name.trim().to_string(),
        amount_cents: fields.amount_cents,
        kind,
        tip_cents: fields.tip_cents,
        payment_method: fields
            .payment_method
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        payment_tag,
        staff_name: auth.name.clone(),
    };

    let tx = state.store.apply_transfer(&request).map_err(|e| {
        tracing::warn!(
            kind = kind.transaction_type().as_str(),
            player_id = %request.player_id,
            game = %request.game_name,
            amount_cents = request.amount_cents,
            error = %e,
            "Transfer rejected"
        );
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// Ledger list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Owning player.
    #[serde(default)]
    pub player_id: Option<String>,
    /// Game.
    #[serde(default)]
    pub game_id: Option<String>,
    /// Entry type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Approval state.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound (RFC 3339).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound (RFC 3339).
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl ListTransactionsQuery {
    fn to_filter(&self) -> Result<TransactionFilter, ApiError> {
        Ok(TransactionFilter {
            player_id: self
                .player_id
                .as_deref()
                .map(parse_id::<PlayerId>)
                .transpose()?,
            game_id: self
                .game_id
                .as_deref()
                .map(parse_id::<GameId>)
                .transpose()?,
            transaction_type: self.transaction_type,
            status: self.status,
            from: self.from,
            to: self.to,
        })
    }
}

/// List ledger entries, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Query(query): Query<ListTransactionsQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<TransactionPage>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let filter = query.to_filter()?;

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

/// Get a ledger entry.
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    auth.require(StaffRole::Cashier)?;
    let transaction_id: TransactionId = parse_id(&id)?;

    let tx = state
        .store
        .get_transaction(&transaction_id)?
        .ok_or_else(|| ApiError::NotFound(format!("transaction not found: {transaction_id}")))?;

    Ok(Json(tx))
}

/// Undo an approved entry and mark it rejected.
pub async fn reverse_transaction(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let transaction_id: TransactionId = parse_id(&id)?;

    let tx = state.store.reverse_transaction(&transaction_id, &auth.name)?;

    Ok(Json(tx))
}
