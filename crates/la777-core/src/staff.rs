//! Staff records mirrored from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::StaffId;

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Identity-provider uid.
    pub id: StaffId,
    /// Display name, written onto ledger entries.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Permission level.
    pub role: StaffRole,
    /// Whether the staff member may act.
    pub status: StaffStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Staff {
    /// Create an active staff record.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a blank name or an email without `@`.
    pub fn new(
        id: StaffId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: StaffRole,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::Validation("staff name is required".into()));
        }
        let email = email.into().trim().to_lowercase();
        if !email.contains('@') {
            return Err(LedgerError::Validation("invalid email".into()));
        }
        Ok(Self {
            id,
            name,
            email,
            role,
            status: StaffStatus::Active,
            created_at: Utc::now(),
        })
    }
}

/// Staff permission levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Records transfers.
    Cashier,
    /// Records transfers and reads reports.
    Agent,
    /// Manages games, tags and reversals.
    Admin,
    /// Manages staff.
    SuperAdmin,
}

impl StaffRole {
    /// Whether this role grants at least `required`.
    #[must_use]
    pub fn allows(self, required: Self) -> bool {
        self >= required
    }
}

/// Staff account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    /// May act.
    Active,
    /// Locked out.
    Blocked,
}
