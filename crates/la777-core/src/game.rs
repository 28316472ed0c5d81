//! Game accounts and their disbursable balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::GameId;

/// A game whose balance funds player-favoring transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game id.
    pub id: GameId,

    /// Unique game name.
    pub name: String,

    /// Funds available to disburse, in cents. Never negative after a transfer.
    pub balance_cents: i64,

    /// Manual top-ups, oldest first.
    pub recharge_history: Vec<RechargeEntry>,

    /// When the game was added.
    pub created_at: DateTime<Utc>,

    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create a game with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a blank name and
    /// `LedgerError::InvalidAmount` for a negative opening balance.
    pub fn new(name: impl Into<String>, balance_cents: i64) -> Result<Self> {
        let name = validate_game_name(&name.into())?;
        if balance_cents < 0 {
            return Err(LedgerError::InvalidAmount(
                "opening balance cannot be negative".into(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: GameId::generate(),
            name,
            balance_cents,
            recharge_history: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Top up the balance and record who did it.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount_cents` is not positive
    /// or the balance would overflow.
    pub fn recharge(&mut self, amount_cents: i64, staff: &str, now: DateTime<Utc>) -> Result<()> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount(
                "recharge amount must be positive".into(),
            ));
        }
        self.balance_cents = self
            .balance_cents
            .checked_add(amount_cents)
            .ok_or_else(|| LedgerError::InvalidAmount("balance overflow".into()))?;
        self.recharge_history.push(RechargeEntry {
            date: now,
            amount_cents,
            kind: RechargeKind::Recharge,
            staff: staff.to_string(),
        });
        self.updated_at = now;
        Ok(())
    }
}

/// Trim a game name and reject blanks.
///
/// # Errors
///
/// Returns `LedgerError::Validation` if the trimmed name is empty.
pub fn validate_game_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("game name is required".into()));
    }
    Ok(trimmed.to_string())
}

/// One manual balance top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeEntry {
    /// When the top-up happened.
    pub date: DateTime<Utc>,
    /// Amount added, in cents.
    pub amount_cents: i64,
    /// Always `Recharge`.
    #[serde(rename = "type")]
    pub kind: RechargeKind,
    /// Staff name.
    pub staff: String,
}

/// Recharge entry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RechargeKind {
    /// Manual top-up.
    Recharge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recharge_adds_to_balance_and_history() {
        let mut game = Game::new("Cosmic", 1_000).unwrap();
        game.recharge(500, "alice", Utc::now()).unwrap();

        assert_eq!(game.balance_cents, 1_500);
        assert_eq!(game.recharge_history.len(), 1);
        assert_eq!(game.recharge_history[0].staff, "alice");
        assert_eq!(game.recharge_history[0].kind, RechargeKind::Recharge);
    }

    #[test]
    fn recharge_rejects_non_positive() {
        let mut game = Game::new("Cosmic", 1_000).unwrap();
        assert!(game.recharge(0, "alice", Utc::now()).is_err());
        assert!(game.recharge(-5, "alice", Utc::now()).is_err());
        assert_eq!(game.balance_cents, 1_000);
        assert!(game.recharge_history.is_empty());
    }

    #[test]
    fn new_game_validation() {
        assert!(Game::new(" ", 0).is_err());
        assert!(Game::new("Cosmic", -1).is_err());
        assert_eq!(Game::new("  Cosmic ", 0).unwrap().name, "Cosmic");
    }
}
