//! Payment tag handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use la777_core::{PaymentTag, PaymentTagId, PaymentTagStatus, StaffRole};
use la777_store::Store;

use super::parse_id;
use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create payment tag request.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentTagRequest {
    /// Payment method, e.g. `CashApp`.
    pub payment_method: String,
    /// `$cashtag` or `@handle`.
    pub tag: String,
}

/// Create a payment tag.
pub async fn create_payment_tag(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<CreatePaymentTagRequest>,
) -> Result<(StatusCode, Json<PaymentTag>), ApiError> {
    auth.require(StaffRole::Admin)?;

    let tag = PaymentTag::new(body.payment_method, body.tag)?;
    state.store.put_payment_tag(&tag)?;

    tracing::info!(tag_id = %tag.id, tag = %tag.tag, method = %tag.payment_method, "Payment tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Payment tag list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListPaymentTagsQuery {
    /// Only tags for this method (case-insensitive).
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// List payment tags, oldest first.
pub async fn list_payment_tags(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Query(query): Query<ListPaymentTagsQuery>,
) -> Result<Json<Vec<PaymentTag>>, ApiError> {
    auth.require(StaffRole::Cashier)?;

    let tags = state
        .store
        .list_payment_tags()?
        .into_iter()
        .filter(|t| {
            query
                .payment_method
                .as_deref()
                .map_or(true, |m| t.payment_method.eq_ignore_ascii_case(m))
        })
        .collect();

    Ok(Json(tags))
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct SetPaymentTagStatusRequest {
    /// New status.
    pub status: PaymentTagStatus,
}

/// Set a payment tag's status.
pub async fn set_payment_tag_status(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<SetPaymentTagStatusRequest>,
) -> Result<Json<PaymentTag>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let tag_id: PaymentTagId = parse_id(&id)?;

    let mut tag = state
        .store
        .get_payment_tag(&tag_id)?
        .ok_or_else(|| ApiError::NotFound(format!("payment tag not found: {tag_id}")))?;
    tag.status = body.status;
    state.store.put_payment_tag(&tag)?;

    Ok(Json(tag))
}

/// Delete a payment tag.
pub async fn delete_payment_tag(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.require(StaffRole::Admin)?;
    let tag_id: PaymentTagId = parse_id(&id)?;

    state.store.delete_payment_tag(&tag_id)?;

    tracing::info!(tag_id = %tag_id, staff = %auth.name, "Payment tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
