//! Staff mirror handlers.
//!
//! Staff accounts are created with the identity provider; these records mirror
//! them so roles and blocks can be managed here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use la777_core::{Staff, StaffId, StaffRole, StaffStatus};
use la777_store::{Store, StoreError};

use super::parse_id;
use crate::auth::StaffAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create staff request.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    /// Identity-provider uid.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Permission level.
    pub role: StaffRole,
}

/// Register a staff mirror record.
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Json(body): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Staff>), ApiError> {
    auth.require(StaffRole::SuperAdmin)?;

    let staff_id: StaffId = parse_id(&body.id)?;
    if state.store.get_staff(&staff_id)?.is_some() {
        return Err(StoreError::AlreadyExists {
            entity: "staff",
            name: staff_id.to_string(),
        }
        .into());
    }

    let staff = Staff::new(staff_id, body.name, body.email, body.role)?;
    state.store.put_staff(&staff)?;

    tracing::info!(staff_id = %staff.id, role = ?staff.role, by = %auth.name, "Staff created");
    Ok((StatusCode::CREATED, Json(staff)))
}

/// List staff ordered by name.
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
) -> Result<Json<Vec<Staff>>, ApiError> {
    auth.require(StaffRole::Admin)?;
    Ok(Json(state.store.list_staff()?))
}

/// Get a staff record.
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError> {
    auth.require(StaffRole::Admin)?;
    let staff_id: StaffId = parse_id(&id)?;

    let staff = state
        .store
        .get_staff(&staff_id)?
        .ok_or_else(|| ApiError::NotFound(format!("staff not found: {staff_id}")))?;

    Ok(Json(staff))
}

/// Role change request.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    /// New role.
    pub role: StaffRole,
}

/// Change a staff member's role.
pub async fn set_staff_role(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<Staff>, ApiError> {
    auth.require(StaffRole::SuperAdmin)?;
    let staff_id: StaffId = parse_id(&id)?;
    reject_self(&auth, &staff_id)?;

    let staff = modify(&state, &staff_id, |s| s.role = body.role)?;

    tracing::info!(staff_id = %staff_id, role = ?body.role, by = %auth.name, "Staff role changed");
    Ok(Json(staff))
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct SetStaffStatusRequest {
    /// New status.
    pub status: StaffStatus,
}

/// Block or unblock a staff member.
pub async fn set_staff_status(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
    Json(body): Json<SetStaffStatusRequest>,
) -> Result<Json<Staff>, ApiError> {
    auth.require(StaffRole::SuperAdmin)?;
    let staff_id: StaffId = parse_id(&id)?;
    reject_self(&auth, &staff_id)?;

    let staff = modify(&state, &staff_id, |s| s.status = body.status)?;

    tracing::info!(staff_id = %staff_id, status = ?body.status, by = %auth.name, "Staff status changed");
    Ok(Json(staff))
}

/// Delete a staff mirror record.
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    auth: StaffAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.require(StaffRole::SuperAdmin)?;
    let staff_id: StaffId = parse_id(&id)?;
    reject_self(&auth, &staff_id)?;

    state.store.delete_staff(&staff_id)?;

    tracing::info!(staff_id = %staff_id, by = %auth.name, "Staff deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn reject_self(auth: &StaffAuth, target: &StaffId) -> Result<(), ApiError> {
    if auth.staff_id == *target {
        return Err(ApiError::BadRequest(
            "staff cannot change their own account".into(),
        ));
    }
    Ok(())
}

fn modify(state: &AppState, staff_id: &StaffId, change: impl FnOnce(&mut Staff)) -> Result<Staff, ApiError> {
    let mut staff = state
        .store
        .get_staff(staff_id)?
        .ok_or_else(|| ApiError::NotFound(format!("staff not found: {staff_id}")))?;
    change(&mut staff);
    state.store.put_staff(&staff)?;
    Ok(staff)
}
