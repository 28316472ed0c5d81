//! Ledger aggregation for reporting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ledger::{Transaction, TransactionType};

/// Totals over a set of approved ledger entries, in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Number of entries.
    pub count: u64,
    /// Sum of deposit amounts.
    pub deposit_cents: i64,
    /// Sum of deposit bonuses.
    pub deposit_bonus_cents: i64,
    /// Sum of withdrawals.
    pub withdraw_cents: i64,
    /// Sum of freeplay credits.
    pub freeplay_cents: i64,
    /// Sum of bonusplay credits.
    pub bonusplay_cents: i64,
    /// Sum of referral bonuses.
    pub referral_cents: i64,
    /// Sum of tips.
    pub tip_cents: i64,
    /// Sum of points.
    pub points_cents: i64,
    /// Deposits minus withdrawals.
    pub net_cents: i64,
}

impl Totals {
    /// Fold one entry in. Sums saturate at the `i64` bounds.
    fn add(&mut self, tx: &Transaction) {
        let sum = |total: &mut i64, value: i64| *total = total.saturating_add(value);

        self.count = self.count.saturating_add(1);
        sum(&mut self.points_cents, tx.points_cents);
        sum(&mut self.tip_cents, tx.tip_cents.unwrap_or(0));
        match tx.transaction_type {
            TransactionType::Deposit => {
                sum(&mut self.deposit_cents, tx.amount_cents);
                sum(&mut self.deposit_bonus_cents, tx.bonus_cents());
                sum(&mut self.net_cents, tx.amount_cents);
            }
            TransactionType::Withdraw => {
                sum(&mut self.withdraw_cents, tx.amount_cents);
                self.net_cents = self.net_cents.saturating_sub(tx.amount_cents);
            }
            TransactionType::Freeplay => sum(&mut self.freeplay_cents, tx.amount_cents),
            TransactionType::Bonusplay => sum(&mut self.bonusplay_cents, tx.amount_cents),
            TransactionType::Referral => sum(&mut self.referral_cents, tx.amount_cents),
        }
    }
}

/// Overall, per-game and per-staff totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Totals over everything.
    pub overall: Totals,
    /// Totals keyed by game name snapshot.
    pub by_game: BTreeMap<String, Totals>,
    /// Totals keyed by staff name.
    pub by_staff: BTreeMap<String, Totals>,
}

impl LedgerSummary {
    /// Aggregate approved entries; pending and rejected ones are skipped.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Self::default();
        for tx in transactions.into_iter().filter(|tx| tx.is_approved()) {
            summary.overall.add(tx);
            summary
                .by_game
                .entry(tx.game_name.clone())
                .or_default()
                .add(tx);
            summary
                .by_staff
                .entry(tx.staff_name.clone())
                .or_default()
                .add(tx);
        }
        summary
    }
}
