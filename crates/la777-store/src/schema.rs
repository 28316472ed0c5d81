//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Player records, keyed by `player_id`.
    pub const PLAYERS: &str = "players";

    /// Game records, keyed by `game_id`.
    pub const GAMES: &str = "games";

    /// Unique index: game name to `game_id`.
    pub const GAMES_BY_NAME: &str = "games_by_name";

    /// Ledger entries, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: ledger entries by player, keyed by `player_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_PLAYER: &str = "transactions_by_player";

    /// Index: ledger entries by game, keyed by `game_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_GAME: &str = "transactions_by_game";

    /// Paid referral bonuses, keyed by `referrer_id || referred_id`.
    /// Value is the `transaction_id` of the payout.
    pub const REFERRAL_PAYOUTS: &str = "referral_payouts";

    /// Payment tags, keyed by `payment_tag_id`.
    pub const PAYMENT_TAGS: &str = "payment_tags";

    /// Staff mirror records, keyed by staff uid.
    pub const STAFF: &str = "staff";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::PLAYERS,
        cf::GAMES,
        cf::GAMES_BY_NAME,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_PLAYER,
        cf::TRANSACTIONS_BY_GAME,
        cf::REFERRAL_PAYOUTS,
        cf::PAYMENT_TAGS,
        cf::STAFF,
    ]
}
