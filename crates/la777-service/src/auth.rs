//! Authentication middleware and extractors.
//!
//! Staff authenticate with an HS256 bearer token whose claims carry the
//! identity-provider uid, display name and role. The staff mirror record, when
//! present, wins over the token: a blocked record is rejected and a changed
//! role takes effect on the next request.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde::{Deserialize, Serialize};

use la777_core::{StaffId, StaffRole, StaffStatus};
use la777_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims for staff tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    /// Subject (identity-provider uid).
    pub sub: String,
    /// Display name written onto ledger entries.
    pub name: String,
    /// Role at issue time.
    pub role: StaffRole,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// An authenticated staff member.
#[derive(Debug, Clone)]
pub struct StaffAuth {
    /// Staff uid.
    pub staff_id: StaffId,
    /// Display name.
    pub name: String,
    /// Effective role.
    pub role: StaffRole,
}

impl StaffAuth {
    /// Reject unless the caller holds at least `required`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` if the role is too low.
    pub fn require(&self, required: StaffRole) -> Result<(), ApiError> {
        if self.role.allows(required) {
            Ok(())
        } else {
            tracing::warn!(
                staff_id = %self.staff_id,
                role = ?self.role,
                required = ?required,
                "Insufficient role"
            );
            Err(ApiError::Forbidden(format!(
                "requires {} role",
                role_name(required)
            )))
        }
    }
}

fn role_name(role: StaffRole) -> &'static str {
    match role {
        StaffRole::Cashier => "cashier",
        StaffRole::Agent => "agent",
        StaffRole::Admin => "admin",
        StaffRole::SuperAdmin => "super_admin",
    }
}

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for StaffAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Extract the Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = validate_jwt(token, state)?;
        let staff_id: StaffId = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;

        let Some(record) = state.store.get_staff(&staff_id)? else {
            return Ok(Self {
                staff_id,
                name: claims.name,
                role: claims.role,
            });
        };

        if record.status == StaffStatus::Blocked {
            tracing::warn!(staff_id = %staff_id, "Blocked staff rejected");
            return Err(ApiError::Forbidden("staff account is blocked".into()));
        }

        Ok(Self {
            staff_id,
            name: record.name,
            role: record.role,
        })
    }
}

/// Validate a staff token against the configured secret.
fn validate_jwt(token: &str, state: &AppState) -> Result<StaffClaims, ApiError> {
    let key = state.jwt_key.as_ref().ok_or(ApiError::Unauthorized)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<StaffClaims>(token, key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}
