//! Balance-transfer rules.
//!
//! A transfer moves money between one game's balance and one player's
//! running totals and appends one ledger entry. This module only computes and
//! validates; the store applies the result atomically.
//!
//! | Kind       | Game balance            | Player stats                                   |
//! |------------|-------------------------|------------------------------------------------|
//! | Deposit    | `-(amount + bonus)`     | `t_deposit += amount`, `t_deposit_bonus += bonus`, `p_and_l += amount` |
//! | Withdraw   | `+amount`               | `t_withdraw += amount`, `p_and_l -= amount`    |
//! | Freeplay   | `-amount`               | `t_free_play += amount`                        |
//! | Bonusplay  | `-amount`               | `t_bonus_play += amount`                       |
//! | Referral   | `-amount`               | referrer `t_referral_bonus += amount`          |
//!
//! Withdrawals have no balance precondition: the game always accepts money back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::{Transaction, TransactionStatus, TransactionType};
use crate::{Game, Player, PlayerId, PlayerStats, TransactionId};

/// What a transfer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferKind {
    /// Game to player, with an optional bonus on top.
    Deposit {
        /// Bonus percentage of `amount`, paid from the game as well.
        bonus_percent: u32,
    },
    /// Player back to game.
    Withdraw,
    /// Freeplay or bonusplay credit.
    Credit {
        /// Which credit.
        credit: CreditType,
    },
    /// Referral bonus paid to the owning player for `referred_id`.
    Referral {
        /// The referred player.
        referred_id: PlayerId,
    },
}

impl TransferKind {
    /// The ledger entry type this transfer produces.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Deposit { .. } => TransactionType::Deposit,
            Self::Withdraw => TransactionType::Withdraw,
            Self::Credit {
                credit: CreditType::Freeplay,
            } => TransactionType::Freeplay,
            Self::Credit {
                credit: CreditType::Bonusplay,
            } => TransactionType::Bonusplay,
            Self::Referral { .. } => TransactionType::Referral,
        }
    }
}

/// Promotional credit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditType {
    /// Free play.
    Freeplay,
    /// Bonus play.
    Bonusplay,
}

/// A staff request to move money for one player on one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Player who owns the ledger entry (the referrer for referrals).
    pub player_id: PlayerId,
    /// Game name, resolved to exactly one game.
    pub game_name: String,
    /// Requested amount in cents.
    pub amount_cents: i64,
    /// What to do.
    pub kind: TransferKind,
    /// Optional tip.
    pub tip_cents: Option<i64>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Payment tag.
    pub payment_tag: Option<String>,
    /// Staff member recording the transfer.
    pub staff_name: String,
}

/// The validated outcome of a transfer, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    /// The transfer kind.
    pub kind: TransferKind,
    /// Requested amount.
    pub amount_cents: i64,
    /// Deposit bonus, zero for other kinds.
    pub bonus_cents: i64,
    /// Total leaving or entering the game.
    pub total_cents: i64,
    /// Game balance the plan was computed against.
    pub game_balance_before_cents: i64,
    /// Game balance once applied.
    pub game_balance_after_cents: i64,
}

impl TransferPlan {
    /// Validate a transfer against the current game balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount_cents <= 0` or the arithmetic overflows.
    /// - `InsufficientGameBalance` if a game-debiting transfer exceeds the balance.
    /// - `NegativeBalanceRejected` if the resulting balance would be negative.
    pub fn compute(kind: TransferKind, amount_cents: i64, game_balance_cents: i64) -> Result<Self> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount("amount must be positive".into()));
        }

        let bonus_cents = match kind {
            TransferKind::Deposit { bonus_percent } => deposit_bonus(amount_cents, bonus_percent)?,
            _ => 0,
        };
        let total_cents = amount_cents
            .checked_add(bonus_cents)
            .ok_or_else(overflow)?;

        let game_balance_after_cents = if kind.transaction_type().debits_game() {
            if game_balance_cents < total_cents {
                return Err(LedgerError::InsufficientGameBalance {
                    balance: game_balance_cents,
                    required: total_cents,
                });
            }
            game_balance_cents - total_cents
        } else {
            game_balance_cents
                .checked_add(amount_cents)
                .ok_or_else(overflow)?
        };

        if game_balance_after_cents < 0 {
            return Err(LedgerError::NegativeBalanceRejected {
                resulting: game_balance_after_cents,
            });
        }

        Ok(Self {
            kind,
            amount_cents,
            bonus_cents,
            total_cents,
            game_balance_before_cents: game_balance_cents,
            game_balance_after_cents,
        })
    }

    /// Points recorded on the ledger entry.
    #[must_use]
    pub const fn points_cents(&self) -> i64 {
        self.total_cents
    }

    /// Apply the plan to the loaded records.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if a running total would overflow. Nothing is
    /// modified in that case.
    pub fn apply(&self, player: &mut Player, game: &mut Game, now: DateTime<Utc>) -> Result<()> {
        let delta = stats_delta(self.kind.transaction_type(), self.amount_cents, self.bonus_cents);
        player.stats = add_stats(&player.stats, &delta, 1)?;
        player.last_activity_at = Some(now);
        player.updated_at = now;

        game.balance_cents = self.game_balance_after_cents;
        game.updated_at = now;
        Ok(())
    }

    /// Build the ledger entry for an applied plan.
    #[must_use]
    pub fn record(
        &self,
        request: &TransferRequest,
        player: &Player,
        game: &Game,
        now: DateTime<Utc>,
    ) -> Transaction {
        let (deposit_bonus_percent, referral_id) = match self.kind {
            TransferKind::Deposit { bonus_percent } => (Some(bonus_percent), None),
            TransferKind::Referral { referred_id } => (None, Some(referred_id)),
            TransferKind::Withdraw | TransferKind::Credit { .. } => (None, None),
        };

        Transaction {
            id: TransactionId::generate(),
            transaction_type: self.kind.transaction_type(),
            amount_cents: self.amount_cents,
            tip_cents: request.tip_cents,
            deposit_bonus_percent,
            points_cents: self.points_cents(),
            payment_method: request.payment_method.clone(),
            payment_tag: request.payment_tag.clone(),
            staff_name: request.staff_name.clone(),
            player_id: player.id,
            player_name: player.name.clone(),
            game_id: game.id,
            game_name: game.name.clone(),
            referral_id,
            status: TransactionStatus::Approved,
            game_balance_before_cents: self.game_balance_before_cents,
            game_balance_after_cents: self.game_balance_after_cents,
            created_at: now,
            reversed_at: None,
            reversed_by: None,
        }
    }
}

/// Undoes an approved ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReversalPlan {
    /// Stats to subtract from the owning player.
    pub stats_delta: PlayerStats,
    /// Signed change to the game balance.
    pub game_delta_cents: i64,
    /// Game balance once applied.
    pub game_balance_after_cents: i64,
}

impl ReversalPlan {
    /// Compute the inverse of `tx` against the game's current balance.
    ///
    /// # Errors
    ///
    /// - `AlreadyReversed` if the entry is not approved.
    /// - `InsufficientGameBalance` if undoing a withdrawal needs more than the game holds.
    pub fn compute(tx: &Transaction, game_balance_cents: i64) -> Result<Self> {
        if !tx.is_approved() {
            return Err(LedgerError::AlreadyReversed {
                transaction_id: tx.id.to_string(),
            });
        }

        let game_delta_cents = tx.game_balance_before_cents - tx.game_balance_after_cents;
        let game_balance_after_cents = game_balance_cents
            .checked_add(game_delta_cents)
            .ok_or_else(overflow)?;
        if game_balance_after_cents < 0 {
            return Err(LedgerError::InsufficientGameBalance {
                balance: game_balance_cents,
                required: -game_delta_cents,
            });
        }

        Ok(Self {
            stats_delta: stats_delta(tx.transaction_type, tx.amount_cents, tx.bonus_cents()),
            game_delta_cents,
            game_balance_after_cents,
        })
    }

    /// Apply the reversal to the loaded records and mark the entry rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if a running total would overflow.
    pub fn apply(
        &self,
        tx: &mut Transaction,
        player: &mut Player,
        game: &mut Game,
        staff: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        player.stats = add_stats(&player.stats, &self.stats_delta, -1)?;
        player.updated_at = now;

        game.balance_cents = self.game_balance_after_cents;
        game.updated_at = now;

        tx.status = TransactionStatus::Rejected;
        tx.reversed_at = Some(now);
        tx.reversed_by = Some(staff.to_string());
        Ok(())
    }
}

/// Bonus in cents for a deposit, truncated to whole cents.
///
/// # Errors
///
/// Returns `InvalidAmount` on overflow.
pub fn deposit_bonus(amount_cents: i64, bonus_percent: u32) -> Result<i64> {
    amount_cents
        .checked_mul(i64::from(bonus_percent))
        .map(|v| v / 100)
        .ok_or_else(overflow)
}

/// The change a transfer makes to the owning player's stats.
#[must_use]
pub fn stats_delta(kind: TransactionType, amount_cents: i64, bonus_cents: i64) -> PlayerStats {
    let mut delta = PlayerStats::default();
    match kind {
        TransactionType::Deposit => {
            delta.t_deposit_cents = amount_cents;
            delta.t_deposit_bonus_cents = bonus_cents;
            delta.p_and_l_cents = amount_cents;
        }
        TransactionType::Withdraw => {
            delta.t_withdraw_cents = amount_cents;
            delta.p_and_l_cents = -amount_cents;
        }
        TransactionType::Freeplay => delta.t_free_play_cents = amount_cents,
        TransactionType::Bonusplay => delta.t_bonus_play_cents = amount_cents,
        TransactionType::Referral => delta.t_referral_bonus_cents = amount_cents,
    }
    delta
}

fn add_stats(stats: &PlayerStats, delta: &PlayerStats, sign: i64) -> Result<PlayerStats> {
    let add = |a: i64, b: i64| {
        b.checked_mul(sign)
            .and_then(|b| a.checked_add(b))
            .ok_or_else(overflow)
    };
    Ok(PlayerStats {
        t_free_play_cents: add(stats.t_free_play_cents, delta.t_free_play_cents)?,
        t_deposit_cents: add(stats.t_deposit_cents, delta.t_deposit_cents)?,
        t_withdraw_cents: add(stats.t_withdraw_cents, delta.t_withdraw_cents)?,
        t_bonus_play_cents: add(stats.t_bonus_play_cents, delta.t_bonus_play_cents)?,
        t_referral_bonus_cents: add(stats.t_referral_bonus_cents, delta.t_referral_bonus_cents)?,
        t_deposit_bonus_cents: add(stats.t_deposit_bonus_cents, delta.t_deposit_bonus_cents)?,
        p_and_l_cents: add(stats.p_and_l_cents, delta.p_and_l_cents)?,
    })
}

fn overflow() -> LedgerError {
    LedgerError::InvalidAmount("amount out of range".into())
}
