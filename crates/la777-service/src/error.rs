//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use la777_core::LedgerError;
use la777_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but insufficient permissions.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - duplicate record or invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The game cannot fund the transfer.
    #[error("insufficient game balance: balance={balance}, required={required}")]
    InsufficientGameBalance {
        /// Current game balance.
        balance: i64,
        /// Amount the transfer needs.
        required: i64,
    },

    /// The transfer would leave the game below zero.
    #[error("negative game balance rejected: resulting={resulting}")]
    NegativeBalanceRejected {
        /// Balance the transfer would have produced.
        resulting: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::InsufficientGameBalance { balance, required } => (
                StatusCode::CONFLICT,
                "insufficient_game_balance",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::NegativeBalanceRejected { resulting } => (
                StatusCode::CONFLICT,
                "negative_balance_rejected",
                self.to_string(),
                Some(serde_json::json!({ "resulting": resulting })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientGameBalance { balance, required } => {
                Self::InsufficientGameBalance { balance, required }
            }
            LedgerError::NegativeBalanceRejected { resulting } => {
                Self::NegativeBalanceRejected { resulting }
            }
            LedgerError::DuplicateGamingAccount { .. }
            | LedgerError::DuplicateReferral
            | LedgerError::AlreadyReversed { .. } => Self::Conflict(err.to_string()),
            LedgerError::InvalidAmount(_)
            | LedgerError::ReferralNotEligible(_)
            | LedgerError::Validation(_)
            | LedgerError::InvalidId(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::AlreadyExists { .. } => Self::Conflict(err.to_string()),
            StoreError::Rule(rule) => rule.into(),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<la777_core::IdError> for ApiError {
    fn from(err: la777_core::IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
