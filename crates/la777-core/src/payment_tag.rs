//! Payment tags offered when recording transfers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::PaymentTagId;

/// A handle (`$cashtag` or `@handle`) staff hand out for a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTag {
    /// Tag id.
    pub id: PaymentTagId,
    /// Owning payment method.
    pub payment_method: String,
    /// The tag, starting with `$` or `@`.
    pub tag: String,
    /// Availability.
    pub status: PaymentTagStatus,
    /// When the tag was added.
    pub created_at: DateTime<Utc>,
}

impl PaymentTag {
    /// Create an active tag.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the method is blank or the tag is malformed.
    pub fn new(payment_method: impl Into<String>, tag: impl Into<String>) -> Result<Self> {
        let payment_method = payment_method.into().trim().to_string();
        if payment_method.is_empty() {
            return Err(LedgerError::Validation("payment method is required".into()));
        }
        Ok(Self {
            id: PaymentTagId::generate(),
            payment_method,
            tag: validate_tag(&tag.into())?,
            status: PaymentTagStatus::Active,
            created_at: Utc::now(),
        })
    }
}

/// Tag availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTagStatus {
    /// Offered in selection menus.
    Active,
    /// Temporarily hidden.
    Inactive,
    /// Retired.
    Deactivated,
}

/// A tag must start with `$` or `@` and have something after the prefix.
///
/// # Errors
///
/// Returns `LedgerError::Validation` otherwise.
pub fn validate_tag(tag: &str) -> Result<String> {
    let trimmed = tag.trim();
    let body = trimmed
        .strip_prefix('$')
        .or_else(|| trimmed.strip_prefix('@'))
        .ok_or_else(|| LedgerError::Validation("tag must start with $ or @".into()))?;
    if body.is_empty() || body.contains(char::is_whitespace) {
        return Err(LedgerError::Validation("tag has no handle".into()));
    }
    Ok(trimmed.to_string())
}
