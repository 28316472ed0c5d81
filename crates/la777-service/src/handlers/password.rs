//! Staff password change.
//!
//! Re-authenticates with the current password, then sets the new one. Both
//! steps go to the identity provider; nothing is stored locally.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::identity::IdentityError;
use crate::state::AppState;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Change password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Current password.
    #[serde(default)]
    pub current_password: Option<String>,
    /// New password.
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Change password response.
#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    /// Whether the password was changed.
    pub success: bool,
    /// Confirmation text on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable failure on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChangePasswordResponse {
    fn ok(message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: Some(message.to_string()),
                error: None,
            }),
        )
    }

    fn fail(status: StatusCode, error: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: false,
                message: None,
                error: Some(error.to_string()),
            }),
        )
    }
}

/// Change a staff member's password.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChangePasswordRequest>,
) -> (StatusCode, Json<ChangePasswordResponse>) {
    let field = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    let (Some(email), Some(current), Some(new)) = (
        field(&body.email).map(|e| e.trim().to_string()),
        field(&body.current_password),
        field(&body.new_password),
    ) else {
        return ChangePasswordResponse::fail(
            StatusCode::BAD_REQUEST,
            "Email, current password and new password are required",
        );
    };

    if new.chars().count() < MIN_PASSWORD_LEN {
        return ChangePasswordResponse::fail(
            StatusCode::BAD_REQUEST,
            "New password must be at least 6 characters",
        );
    }
    if new == current {
        return ChangePasswordResponse::fail(
            StatusCode::BAD_REQUEST,
            "New password must be different from the current password",
        );
    }

    let Some(identity) = state.identity.as_ref() else {
        tracing::error!("Password change requested but identity provider is not configured");
        return ChangePasswordResponse::fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Password service is not configured",
        );
    };

    let session = match identity.sign_in(&email, &current).await {
        Ok(session) => session,
        Err(e) => return failure(&e),
    };

    if let Err(e) = identity.update_password(&session.id_token, &new).await {
        return failure(&e);
    }

    tracing::info!(email = %email, "Password changed");
    ChangePasswordResponse::ok("Password updated successfully")
}

/// Map an identity error to a status and user-facing text.
fn failure(err: &IdentityError) -> (StatusCode, Json<ChangePasswordResponse>) {
    let (status, text) = describe(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "Password change failed");
    } else {
        tracing::warn!(error = %err, "Password change rejected");
    }
    ChangePasswordResponse::fail(status, text)
}

fn describe(err: &IdentityError) -> (StatusCode, &'static str) {
    let Some(code) = err.code() else {
        return (StatusCode::BAD_GATEWAY, "Password service is unavailable");
    };
    match code {
        "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" => {
            (StatusCode::BAD_REQUEST, "Invalid email or password")
        }
        "USER_DISABLED" => (StatusCode::BAD_REQUEST, "This account has been disabled"),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many attempts. Please try again later",
        ),
        c if c.starts_with("WEAK_PASSWORD") => (
            StatusCode::BAD_REQUEST,
            "New password is too weak",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to change password",
        ),
    }
}
