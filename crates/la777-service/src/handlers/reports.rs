//! Reporting handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use la777_core::{LedgerSummary, StaffRole};
use la777_store::{Store, TransactionFilter};

use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Report window query parameters.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Inclusive lower bound (RFC 3339).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound (RFC 3339).
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

/// Totals over approved ledger entries, overall and per game and staff.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<LedgerSummary>, ApiError> {
    auth.require(StaffRole::Agent)?;

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from >= to {
            return Err(ApiError::BadRequest("`from` must be before `to`".into()));
        }
    }

    let filter = TransactionFilter {
        from: query.from,
        to: query.to,
        ..TransactionFilter::default()
    };
    let entries = state.store.list_transactions(&filter, usize::MAX, 0)?;

    Ok(Json(LedgerSummary::from_transactions(&entries)))
}
