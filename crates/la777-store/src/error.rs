//! Error types for storage.

use la777_core::LedgerError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// The id or name that was looked up.
        id: String,
    },

    /// A unique name is already taken.
    #[error("{entity} already exists: {name}")]
    AlreadyExists {
        /// Kind of record.
        entity: &'static str,
        /// The conflicting name or id.
        name: String,
    },

    /// A domain rule rejected the operation before anything was written.
    #[error(transparent)]
    Rule(#[from] LedgerError),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
