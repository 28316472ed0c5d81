//! Error types for ledger rules and record validation.

use crate::ids::IdError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised by the domain rules, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Amount is zero, negative, or overflows.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The game cannot cover the requested transfer.
    #[error("insufficient game balance: balance={balance}, required={required}")]
    InsufficientGameBalance {
        /// Current game balance in cents.
        balance: i64,
        /// Amount the transfer needs in cents.
        required: i64,
    },

    /// The transfer would leave the game balance below zero.
    #[error("resulting game balance would be negative: {resulting}")]
    NegativeBalanceRejected {
        /// The balance the transfer would have produced.
        resulting: i64,
    },

    /// A player already holds an account for this game.
    #[error("player already has an account for game {game_name}")]
    DuplicateGamingAccount {
        /// The game name.
        game_name: String,
    },

    /// The referred player does not qualify for a referral bonus.
    #[error("referral not eligible: {0}")]
    ReferralNotEligible(String),

    /// A bonus has already been paid for this referrer/referred pair.
    #[error("referral bonus already paid for this player")]
    DuplicateReferral,

    /// The ledger entry is no longer approved and cannot be reversed.
    #[error("transaction {transaction_id} is already reversed")]
    AlreadyReversed {
        /// The ledger entry id.
        transaction_id: String,
    },

    /// A record field failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
