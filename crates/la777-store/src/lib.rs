//! `RocksDB` storage layer for the LA777 back office.
//!
//! This crate persists players, games, the transaction ledger, payment tags and
//! staff records using `RocksDB` with column families for indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `players`: Player records, keyed by `player_id`
//! - `games`: Game records, keyed by `game_id`
//! - `games_by_name`: Unique name index for games
//! - `transactions`: Ledger entries, keyed by `transaction_id` (ULID)
//! - `transactions_by_player` / `transactions_by_game`: Ledger indexes
//! - `referral_payouts`: One marker per paid referrer/referred pair
//! - `payment_tags`, `staff`: Supporting records
//!
//! # Atomicity
//!
//! Every operation that touches more than one record (a transfer, a reversal,
//! a game rename cascade) reads, validates and commits one `WriteBatch` while
//! holding the store's writer lock. Validation therefore always sees the state
//! the batch is applied to.
//!
//! # Example
//!
//! ```no_run
//! use la777_core::{CreditType, Game, Player, TransferKind, TransferRequest};
//! use la777_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/la777-db").unwrap();
//!
//! let game = Game::new("Cosmic", 100_000).unwrap();
//! store.create_game(&game).unwrap();
//!
//! let player = Player::new("Alice", "https://facebook.com/alice", None).unwrap();
//! store.create_player(&player).unwrap();
//!
//! let tx = store
//!     .apply_transfer(&TransferRequest {
//!         player_id: player.id,
//!         game_name: "Cosmic".into(),
//!         amount_cents: 1_000,
//!         kind: TransferKind::Credit { credit: CreditType::Freeplay },
//!         tip_cents: None,
//!         payment_method: None,
//!         payment_tag: None,
//!         staff_name: "alice".into(),
//!     })
//!     .unwrap();
//! assert_eq!(tx.game_balance_after_cents, 99_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::{DateTime, Duration, Utc};
use la777_core::{
    Game, GameId, GamingAccount, PaymentTag, PaymentTagId, Player, PlayerId, Staff, StaffId, Transaction,
    TransactionId, TransactionStatus, TransactionType, TransferRequest,
};

/// Filter for ledger listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Owning player.
    pub player_id: Option<PlayerId>,
    /// Game.
    pub game_id: Option<GameId>,
    /// Entry type.
    pub transaction_type: Option<TransactionType>,
    /// Approval state.
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Whether an entry passes every set field.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.player_id.map_or(true, |id| tx.player_id == id)
            && self.game_id.map_or(true, |id| tx.game_id == id)
            && self
                .transaction_type
                .map_or(true, |t| tx.transaction_type == t)
            && self.status.map_or(true, |s| tx.status == s)
            && self.from.map_or(true, |from| tx.created_at >= from)
            && self.to.map_or(true, |to| tx.created_at < to)
    }
}

/// Result of a game rename or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// The game as it now stands (as it stood, for deletes).
    pub game: Game,
    /// Number of players whose gaming accounts changed.
    pub players_updated: usize,
}

/// Callback used to edit a record under the writer lock.
pub type Edit<'a, T> = &'a mut dyn FnMut(&mut T) -> la777_core::Result<()>;

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Player Operations
    // =========================================================================

    /// Insert a new player.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the id is taken.
    fn create_player(&self, player: &Player) -> Result<()>;

    /// Get a player by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_player(&self, player_id: &PlayerId) -> Result<Option<Player>>;

    /// List all players ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_players(&self) -> Result<Vec<Player>>;

    /// Edit a player's profile, status or gaming accounts under the writer lock.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the player doesn't exist, or the
    /// edit's own error.
    ///
    /// Renaming a player rewrites `referred_by` on every player who named the
    /// old name, in the same batch.
    fn update_player(&self, player_id: &PlayerId, edit: Edit<'_, Player>) -> Result<Player>;

    /// Attach a gaming account on an existing game.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the player or the game doesn't exist.
    /// - `LedgerError::DuplicateGamingAccount` if the player already has one.
    fn add_gaming_account(&self, player_id: &PlayerId, account: GamingAccount) -> Result<Player>;

    /// Remove the player's account on a game.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the player doesn't exist or holds no
    /// account on that game. Nothing is written then.
    fn remove_gaming_account(&self, player_id: &PlayerId, game_name: &str) -> Result<Player>;

    /// Delete players together with their ledger entries and referral markers.
    ///
    /// Returns the number of ledger entries removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if any id doesn't exist; nothing is deleted then.
    fn delete_players(&self, player_ids: &[PlayerId]) -> Result<usize>;

    // =========================================================================
    // Game Operations
    // =========================================================================

    /// Insert a new game.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the name is taken.
    fn create_game(&self, game: &Game) -> Result<()>;

    /// Get a game by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_game(&self, game_id: &GameId) -> Result<Option<Game>>;

    /// Resolve a game by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_game_by_name(&self, name: &str) -> Result<Option<Game>>;

    /// List all games ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_games(&self) -> Result<Vec<Game>>;

    /// Rename a game and every player gaming account that references it.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the game doesn't exist.
    /// - `StoreError::AlreadyExists` if another game has the new name.
    fn rename_game(&self, game_id: &GameId, new_name: &str) -> Result<CascadeOutcome>;

    /// Delete a game and every player gaming account that references it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the game doesn't exist.
    fn delete_game(&self, game_id: &GameId) -> Result<CascadeOutcome>;

    /// Add a manual top-up to a game's balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the game doesn't exist.
    /// - `StoreError::Rule` if the amount is not positive.
    fn recharge_game(&self, game_id: &GameId, amount_cents: i64, staff: &str) -> Result<Game>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Get a ledger entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// List ledger entries matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    /// Timestamp of the player's newest ledger entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn last_activity(&self, player_id: &PlayerId) -> Result<Option<DateTime<Utc>>>;

    /// Whether a referral bonus has been paid to `referrer` for `referred`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_referral_payout(&self, referrer: &PlayerId, referred: &PlayerId) -> Result<bool>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Validate and apply a balance transfer, appending one ledger entry.
    ///
    /// Player stats, game balance, the ledger entry and its indexes are
    /// committed together or not at all.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the player or game doesn't exist.
    /// - `StoreError::Rule` for invalid amounts, insufficient game balance,
    ///   or an ineligible/duplicate referral.
    fn apply_transfer(&self, request: &TransferRequest) -> Result<Transaction>;

    /// Undo an approved ledger entry and mark it rejected.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the entry, its player or its game is gone.
    /// - `StoreError::Rule` if it is already reversed or the game cannot
    ///   cover an undone withdrawal.
    fn reverse_transaction(&self, transaction_id: &TransactionId, staff: &str)
        -> Result<Transaction>;

    /// Mark active players without recent ledger activity as inactive.
    ///
    /// Returns the ids that changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn mark_inactive_players(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<PlayerId>>;

    // =========================================================================
    // Payment Tag Operations
    // =========================================================================

    /// Insert or update a payment tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_payment_tag(&self, tag: &PaymentTag) -> Result<()>;

    /// Get a payment tag by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment_tag(&self, tag_id: &PaymentTagId) -> Result<Option<PaymentTag>>;

    /// List all payment tags, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_payment_tags(&self) -> Result<Vec<PaymentTag>>;

    /// Delete a payment tag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the tag doesn't exist.
    fn delete_payment_tag(&self, tag_id: &PaymentTagId) -> Result<()>;

    // =========================================================================
    // Staff Operations
    // =========================================================================

    /// Insert or update a staff record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_staff(&self, staff: &Staff) -> Result<()>;

    /// Get a staff record by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_staff(&self, staff_id: &StaffId) -> Result<Option<Staff>>;

    /// List all staff ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_staff(&self) -> Result<Vec<Staff>>;

    /// Delete a staff record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    fn delete_staff(&self, staff_id: &StaffId) -> Result<()>;
}
