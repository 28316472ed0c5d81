//! API handlers.

use serde::Deserialize;

use crate::error::ApiError;

pub mod games;
pub mod health;
pub mod password;
pub mod payment_tags;
pub mod players;
pub mod reports;
pub mod staff;
pub mod transactions;

/// Hard cap on page size.
const MAX_PAGE_SIZE: usize = 500;

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// Maximum number of entries to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Pagination {
    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Parse a path segment into a typed id.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = la777_core::IdError>,
{
    raw.parse().map_err(ApiError::from)
}
