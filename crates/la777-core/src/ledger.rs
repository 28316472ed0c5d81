//! Ledger entries.
//!
//! Every balance transfer appends exactly one [`Transaction`]. Entries are
//! immutable apart from `status`, which only moves from `Approved` to
//! `Rejected` through a reversal that undoes the recorded effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, PlayerId, TransactionId};

/// A monetary event between a player and a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id (ULID for time-ordering).
    pub id: TransactionId,

    /// Kind of transfer.
    pub transaction_type: TransactionType,

    /// Amount requested, in cents, excluding any deposit bonus.
    pub amount_cents: i64,

    /// Optional tip recorded alongside the transfer.
    pub tip_cents: Option<i64>,

    /// Deposit bonus percentage, deposits only.
    pub deposit_bonus_percent: Option<u32>,

    /// Total moved out of or into the game, used by reporting.
    pub points_cents: i64,

    /// Payment method (e.g. `CashApp`).
    pub payment_method: Option<String>,

    /// Payment tag used for the transfer.
    pub payment_tag: Option<String>,

    /// Staff member who recorded the transfer.
    pub staff_name: String,

    /// Owning player.
    pub player_id: PlayerId,

    /// Player name at the time of the transfer.
    pub player_name: String,

    /// Game that funded or received the transfer.
    pub game_id: GameId,

    /// Game name at the time of the transfer.
    pub game_name: String,

    /// Referred player, referral bonuses only.
    pub referral_id: Option<PlayerId>,

    /// Approval state.
    pub status: TransactionStatus,

    /// Game balance before the transfer.
    pub game_balance_before_cents: i64,

    /// Game balance after the transfer.
    pub game_balance_after_cents: i64,

    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,

    /// When the entry was reversed, if it was.
    pub reversed_at: Option<DateTime<Utc>>,

    /// Who reversed it.
    pub reversed_by: Option<String>,
}

impl Transaction {
    /// Whether the entry still counts towards balances and reports.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == TransactionStatus::Approved
    }

    /// Deposit bonus portion of `points_cents`.
    #[must_use]
    pub fn bonus_cents(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Deposit => self.points_cents - self.amount_cents,
            _ => 0,
        }
    }
}

/// Ledger entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money from the game to the player.
    Deposit,
    /// Money from the player back to the game.
    Withdraw,
    /// Promotional credit, one-way.
    Freeplay,
    /// Bonus credit, one-way.
    Bonusplay,
    /// Referral bonus to the referring player.
    Referral,
}

impl TransactionType {
    /// Lower-case name as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Freeplay => "freeplay",
            Self::Bonusplay => "bonusplay",
            Self::Referral => "referral",
        }
    }

    /// Whether the transfer draws on the game balance.
    #[must_use]
    pub const fn debits_game(&self) -> bool {
        !matches!(self, Self::Withdraw)
    }
}

/// Approval state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting approval.
    Pending,
    /// Applied to balances.
    Approved,
    /// Reversed; no longer affects balances.
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_withdraw_credits_the_game() {
        assert!(TransactionType::Deposit.debits_game());
        assert!(TransactionType::Freeplay.debits_game());
        assert!(TransactionType::Bonusplay.debits_game());
        assert!(TransactionType::Referral.debits_game());
        assert!(!TransactionType::Withdraw.debits_game());
    }

    #[test]
    fn type_serializes_lower_case() {
        let json = serde_json::to_string(&TransactionType::Bonusplay).unwrap();
        assert_eq!(json, "\"bonusplay\"");
        assert_eq!(TransactionType::Bonusplay.as_str(), "bonusplay");
    }
}
