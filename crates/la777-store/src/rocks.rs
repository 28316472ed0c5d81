//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use tracing::{debug, info};

use la777_core::{
    is_inactive, validate_game_name, Game, GameId, GamingAccount, LedgerError, PaymentTag,
    PaymentTagId, Player, PlayerId, PlayerStatus, ReversalPlan, Staff, StaffId, Transaction, TransactionId,
    TransferKind, TransferPlan, TransferRequest,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{CascadeOutcome, Edit, Store, TransactionFilter};

/// RocksDB-backed storage implementation.
///
/// Reads go straight to the database. Every mutation takes `write_lock`, so a
/// read-validate-commit sequence cannot interleave with another one.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("writer lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_value<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self
            .db
            .get_pinned_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some())
    }

    /// Every value in a column family, in key order.
    fn scan_values<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            values.push(Self::deserialize(&value)?);
        }
        Ok(values)
    }

    /// Transaction ids under an owner prefix, oldest first.
    fn indexed_transaction_ids(&self, cf_name: &str, owner: &[u8; 16]) -> Result<Vec<TransactionId>> {
        let cf = self.cf(cf_name)?;
        let mut ids = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(owner, Direction::Forward))
        {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(owner) {
                break;
            }
            if let Some(id) = keys::extract_transaction_id(&key) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn load_player(&self, player_id: &PlayerId) -> Result<Player> {
        self.get_player(player_id)?
            .ok_or_else(|| StoreError::not_found("player", player_id))
    }

    fn load_game(&self, game_id: &GameId) -> Result<Game> {
        self.get_game(game_id)?
            .ok_or_else(|| StoreError::not_found("game", game_id))
    }

    /// Referral payouts need a referred player who names the referrer, has
    /// deposited, and has not been paid for yet.
    fn check_referral(&self, referrer: &Player, referred_id: &PlayerId) -> Result<()> {
        if *referred_id == referrer.id {
            return Err(LedgerError::ReferralNotEligible("a player cannot refer themselves".into()).into());
        }
        let referred = self.load_player(referred_id)?;
        if referred.referred_by.as_deref() != Some(referrer.name.as_str()) {
            return Err(LedgerError::ReferralNotEligible(format!(
                "{} was not referred by {}",
                referred.name, referrer.name
            ))
            .into());
        }
        if referred.stats.t_deposit_cents <= 0 {
            return Err(LedgerError::ReferralNotEligible(format!(
                "{} has not deposited yet",
                referred.name
            ))
            .into());
        }
        if self.has_referral_payout(&referrer.id, referred_id)? {
            return Err(LedgerError::DuplicateReferral.into());
        }
        Ok(())
    }

    /// Stage a player's ledger entries and referral markers for deletion.
    fn stage_player_ledger_delete(&self, batch: &mut WriteBatch, player_id: &PlayerId) -> Result<usize> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_player = self.cf(cf::TRANSACTIONS_BY_PLAYER)?;
        let cf_by_game = self.cf(cf::TRANSACTIONS_BY_GAME)?;
        let cf_referrals = self.cf(cf::REFERRAL_PAYOUTS)?;

        let ids = self.indexed_transaction_ids(cf::TRANSACTIONS_BY_PLAYER, player_id.as_bytes())?;
        for id in &ids {
            batch.delete_cf(&cf_by_player, keys::owner_transaction_key(player_id.as_bytes(), id));
            let Some(tx) = self.get_transaction(id)? else {
                continue;
            };
            batch.delete_cf(&cf_tx, keys::transaction_key(id));
            batch.delete_cf(&cf_by_game, keys::owner_transaction_key(tx.game_id.as_bytes(), id));
            if let Some(referred) = tx.referral_id {
                batch.delete_cf(&cf_referrals, keys::referral_key(player_id, &referred));
            }
        }
        Ok(ids.len())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Player Operations
    // =========================================================================

    fn create_player(&self, player: &Player) -> Result<()> {
        let _guard = self.lock()?;
        let key = keys::player_key(&player.id);
        if self.exists(cf::PLAYERS, &key)? {
            return Err(StoreError::AlreadyExists {
                entity: "player",
                name: player.id.to_string(),
            });
        }

        let cf = self.cf(cf::PLAYERS)?;
        self.db
            .put_cf(&cf, key, Self::serialize(player)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!(player_id = %player.id, name = %player.name, "Player created");
        Ok(())
    }

    fn get_player(&self, player_id: &PlayerId) -> Result<Option<Player>> {
        self.get_value(cf::PLAYERS, &keys::player_key(player_id))
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let mut players: Vec<Player> = self.scan_values(cf::PLAYERS)?;
        players.sort_by_key(|p| p.name.to_lowercase());
        Ok(players)
    }

    fn update_player(&self, player_id: &PlayerId, edit: Edit<'_, Player>) -> Result<Player> {
        let _guard = self.lock()?;
        let mut player = self.load_player(player_id)?;
        let old_name = player.name.clone();
        edit(&mut player)?;
        let now = Utc::now();
        player.updated_at = now;

        let cf = self.cf(cf::PLAYERS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf, keys::player_key(player_id), Self::serialize(&player)?);

        let mut referrals_updated = 0;
        if player.name != old_name {
            for mut referred in self.scan_values::<Player>(cf::PLAYERS)? {
                let named_old = referred.referred_by.as_deref() == Some(old_name.as_str());
                if referred.id == *player_id || !named_old {
                    continue;
                }
                referred.referred_by = Some(player.name.clone());
                referred.updated_at = now;
                batch.put_cf(&cf, keys::player_key(&referred.id), Self::serialize(&referred)?);
                referrals_updated += 1;
            }
        }
        self.write(batch)?;

        if referrals_updated > 0 {
            info!(
                player_id = %player_id,
                old_name = %old_name,
                new_name = %player.name,
                referrals_updated,
                "Player renamed with referral cascade"
            );
        }
        Ok(player)
    }

    fn add_gaming_account(&self, player_id: &PlayerId, account: GamingAccount) -> Result<Player> {
        let _guard = self.lock()?;
        let mut player = self.load_player(player_id)?;
        if self.find_game_by_name(&account.game_name)?.is_none() {
            return Err(StoreError::not_found("game", &account.game_name));
        }
        player.add_gaming_account(account)?;
        player.updated_at = Utc::now();

        let cf = self.cf(cf::PLAYERS)?;
        self.db
            .put_cf(&cf, keys::player_key(player_id), Self::serialize(&player)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(player)
    }

    fn remove_gaming_account(&self, player_id: &PlayerId, game_name: &str) -> Result<Player> {
        let _guard = self.lock()?;
        let mut player = self.load_player(player_id)?;
        if !player.remove_gaming_account(game_name) {
            return Err(StoreError::not_found(
                "gaming account",
                format!("{game_name} for player {player_id}"),
            ));
        }
        player.updated_at = Utc::now();

        let cf = self.cf(cf::PLAYERS)?;
        self.db
            .put_cf(&cf, keys::player_key(player_id), Self::serialize(&player)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(player)
    }

    fn delete_players(&self, player_ids: &[PlayerId]) -> Result<usize> {
        let _guard = self.lock()?;
        let cf_players = self.cf(cf::PLAYERS)?;

        let mut unique = player_ids.to_vec();
        unique.sort_by_key(|id| *id.as_bytes());
        unique.dedup();

        let mut batch = WriteBatch::default();
        let mut removed = 0;
        for player_id in &unique {
            let key = keys::player_key(player_id);
            if !self.exists(cf::PLAYERS, &key)? {
                return Err(StoreError::not_found("player", player_id));
            }
            batch.delete_cf(&cf_players, key);
            removed += self.stage_player_ledger_delete(&mut batch, player_id)?;
        }
        self.write(batch)?;

        info!(
            players = unique.len(),
            transactions = removed,
            "Players deleted"
        );
        Ok(removed)
    }

    // =========================================================================
    // Game Operations
    // =========================================================================

    fn create_game(&self, game: &Game) -> Result<()> {
        let _guard = self.lock()?;
        let name_key = keys::game_name_key(&game.name);
        if self.exists(cf::GAMES_BY_NAME, &name_key)? {
            return Err(StoreError::AlreadyExists {
                entity: "game",
                name: game.name.clone(),
            });
        }

        let cf_games = self.cf(cf::GAMES)?;
        let cf_names = self.cf(cf::GAMES_BY_NAME)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_games, keys::game_key(&game.id), Self::serialize(game)?);
        batch.put_cf(&cf_names, name_key, keys::game_key(&game.id));
        self.write(batch)?;

        info!(game_id = %game.id, name = %game.name, balance_cents = game.balance_cents, "Game created");
        Ok(())
    }

    fn get_game(&self, game_id: &GameId) -> Result<Option<Game>> {
        self.get_value(cf::GAMES, &keys::game_key(game_id))
    }

    fn find_game_by_name(&self, name: &str) -> Result<Option<Game>> {
        let cf = self.cf(cf::GAMES_BY_NAME)?;
        let Some(value) = self
            .db
            .get_cf(&cf, keys::game_name_key(name))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        let game_id = keys::decode_game_id(&value)
            .ok_or_else(|| StoreError::Serialization(format!("bad name index entry for {name}")))?;
        self.get_game(&game_id)
    }

    fn list_games(&self) -> Result<Vec<Game>> {
        let mut games: Vec<Game> = self.scan_values(cf::GAMES)?;
        games.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(games)
    }

    fn rename_game(&self, game_id: &GameId, new_name: &str) -> Result<CascadeOutcome> {
        let _guard = self.lock()?;
        let new_name = validate_game_name(new_name)?;
        let mut game = self.load_game(game_id)?;
        if game.name == new_name {
            return Ok(CascadeOutcome {
                game,
                players_updated: 0,
            });
        }
        if self.exists(cf::GAMES_BY_NAME, &keys::game_name_key(&new_name))? {
            return Err(StoreError::AlreadyExists {
                entity: "game",
                name: new_name,
            });
        }

        let cf_games = self.cf(cf::GAMES)?;
        let cf_names = self.cf(cf::GAMES_BY_NAME)?;
        let cf_players = self.cf(cf::PLAYERS)?;
        let now = Utc::now();
        let old_name = std::mem::replace(&mut game.name, new_name);
        game.updated_at = now;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_names, keys::game_name_key(&old_name));
        batch.put_cf(&cf_names, keys::game_name_key(&game.name), keys::game_key(game_id));
        batch.put_cf(&cf_games, keys::game_key(game_id), Self::serialize(&game)?);

        let mut players_updated = 0;
        for mut player in self.scan_values::<Player>(cf::PLAYERS)? {
            if player.rename_gaming_accounts(&old_name, &game.name) {
                player.updated_at = now;
                batch.put_cf(&cf_players, keys::player_key(&player.id), Self::serialize(&player)?);
                players_updated += 1;
            }
        }
        self.write(batch)?;

        info!(
            game_id = %game_id,
            old_name = %old_name,
            new_name = %game.name,
            players_updated,
            "Game renamed"
        );
        Ok(CascadeOutcome {
            game,
            players_updated,
        })
    }

    fn delete_game(&self, game_id: &GameId) -> Result<CascadeOutcome> {
        let _guard = self.lock()?;
        let game = self.load_game(game_id)?;

        let cf_games = self.cf(cf::GAMES)?;
        let cf_names = self.cf(cf::GAMES_BY_NAME)?;
        let cf_players = self.cf(cf::PLAYERS)?;
        let now = Utc::now();

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_games, keys::game_key(game_id));
        batch.delete_cf(&cf_names, keys::game_name_key(&game.name));

        let mut players_updated = 0;
        for mut player in self.scan_values::<Player>(cf::PLAYERS)? {
            if player.remove_gaming_account(&game.name) {
                player.updated_at = now;
                batch.put_cf(&cf_players, keys::player_key(&player.id), Self::serialize(&player)?);
                players_updated += 1;
            }
        }
        self.write(batch)?;

        info!(game_id = %game_id, name = %game.name, players_updated, "Game deleted");
        Ok(CascadeOutcome {
            game,
            players_updated,
        })
    }

    fn recharge_game(&self, game_id: &GameId, amount_cents: i64, staff: &str) -> Result<Game> {
        let _guard = self.lock()?;
        let mut game = self.load_game(game_id)?;
        game.recharge(amount_cents, staff, Utc::now())?;

        let cf = self.cf(cf::GAMES)?;
        self.db
            .put_cf(&cf, keys::game_key(game_id), Self::serialize(&game)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        info!(game_id = %game_id, amount_cents, balance_cents = game.balance_cents, staff, "Game recharged");
        Ok(game)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        self.get_value(cf::TRANSACTIONS, &keys::transaction_key(transaction_id))
    }

    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        // Narrow the scan through an index when the filter allows it.
        let indexed = match (filter.player_id, filter.game_id) {
            (Some(player_id), _) => Some(
                self.indexed_transaction_ids(cf::TRANSACTIONS_BY_PLAYER, player_id.as_bytes())?,
            ),
            (None, Some(game_id)) => {
                Some(self.indexed_transaction_ids(cf::TRANSACTIONS_BY_GAME, game_id.as_bytes())?)
            }
            (None, None) => None,
        };

        let newest_first: Vec<Transaction> = match indexed {
            Some(ids) => {
                let mut entries = Vec::with_capacity(ids.len());
                for id in ids.iter().rev() {
                    if let Some(tx) = self.get_transaction(id)? {
                        entries.push(tx);
                    }
                }
                entries
            }
            None => {
                let cf = self.cf(cf::TRANSACTIONS)?;
                let mut entries = Vec::new();
                for item in self.db.iterator_cf(&cf, IteratorMode::End) {
                    let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
                    entries.push(Self::deserialize(&value)?);
                }
                entries
            }
        };

        Ok(newest_first
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn last_activity(&self, player_id: &PlayerId) -> Result<Option<DateTime<Utc>>> {
        let cf = self.cf(cf::TRANSACTIONS_BY_PLAYER)?;
        let prefix = player_id.as_bytes();
        let mut upper = prefix.to_vec();
        upper.extend_from_slice(&[0xff; 16]);

        let mut iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&upper, Direction::Reverse));
        let Some(item) = iter.next() else {
            return Ok(None);
        };
        let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
        if !key.starts_with(prefix) {
            return Ok(None);
        }
        let Some(id) = keys::extract_transaction_id(&key) else {
            return Ok(None);
        };
        Ok(self.get_transaction(&id)?.map(|tx| tx.created_at))
    }

    fn has_referral_payout(&self, referrer: &PlayerId, referred: &PlayerId) -> Result<bool> {
        self.exists(cf::REFERRAL_PAYOUTS, &keys::referral_key(referrer, referred))
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn apply_transfer(&self, request: &TransferRequest) -> Result<Transaction> {
        let _guard = self.lock()?;

        if request.tip_cents.is_some_and(|tip| tip < 0) {
            return Err(LedgerError::InvalidAmount("tip cannot be negative".into()).into());
        }
        let mut player = self.load_player(&request.player_id)?;
        let mut game = self
            .find_game_by_name(&request.game_name)?
            .ok_or_else(|| StoreError::not_found("game", &request.game_name))?;
        if let TransferKind::Referral { referred_id } = request.kind {
            self.check_referral(&player, &referred_id)?;
        }

        let plan = TransferPlan::compute(request.kind, request.amount_cents, game.balance_cents)?;
        let now = Utc::now();
        plan.apply(&mut player, &mut game, now)?;
        let tx = plan.record(request, &player, &game, now);

        let cf_players = self.cf(cf::PLAYERS)?;
        let cf_games = self.cf(cf::GAMES)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_player = self.cf(cf::TRANSACTIONS_BY_PLAYER)?;
        let cf_by_game = self.cf(cf::TRANSACTIONS_BY_GAME)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_players, keys::player_key(&player.id), Self::serialize(&player)?);
        batch.put_cf(&cf_games, keys::game_key(&game.id), Self::serialize(&game)?);
        batch.put_cf(&cf_tx, keys::transaction_key(&tx.id), Self::serialize(&tx)?);
        batch.put_cf(&cf_by_player, keys::owner_transaction_key(player.id.as_bytes(), &tx.id), b"");
        batch.put_cf(&cf_by_game, keys::owner_transaction_key(game.id.as_bytes(), &tx.id), b"");
        if let Some(referred) = tx.referral_id {
            let cf_referrals = self.cf(cf::REFERRAL_PAYOUTS)?;
            batch.put_cf(&cf_referrals, keys::referral_key(&player.id, &referred), keys::transaction_key(&tx.id));
        }
        self.write(batch)?;

        info!(
            transaction_id = %tx.id,
            kind = tx.transaction_type.as_str(),
            player_id = %player.id,
            game = %game.name,
            amount_cents = tx.amount_cents,
            game_balance_cents = game.balance_cents,
            staff = %tx.staff_name,
            "Transfer applied"
        );
        Ok(tx)
    }

    fn reverse_transaction(&self, transaction_id: &TransactionId, staff: &str) -> Result<Transaction> {
        let _guard = self.lock()?;

        let mut tx = self
            .get_transaction(transaction_id)?
            .ok_or_else(|| StoreError::not_found("transaction", transaction_id))?;
        let mut player = self.load_player(&tx.player_id)?;
        let mut game = self.load_game(&tx.game_id)?;

        let plan = ReversalPlan::compute(&tx, game.balance_cents)?;
        plan.apply(&mut tx, &mut player, &mut game, staff, Utc::now())?;

        let cf_players = self.cf(cf::PLAYERS)?;
        let cf_games = self.cf(cf::GAMES)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_players, keys::player_key(&player.id), Self::serialize(&player)?);
        batch.put_cf(&cf_games, keys::game_key(&game.id), Self::serialize(&game)?);
        batch.put_cf(&cf_tx, keys::transaction_key(&tx.id), Self::serialize(&tx)?);
        if let Some(referred) = tx.referral_id {
            // A reversed payout can be paid again.
            let cf_referrals = self.cf(cf::REFERRAL_PAYOUTS)?;
            batch.delete_cf(&cf_referrals, keys::referral_key(&player.id, &referred));
        }
        self.write(batch)?;

        info!(
            transaction_id = %tx.id,
            kind = tx.transaction_type.as_str(),
            game_delta_cents = plan.game_delta_cents,
            staff,
            "Transaction reversed"
        );
        Ok(tx)
    }

    fn mark_inactive_players(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<PlayerId>> {
        let _guard = self.lock()?;
        let cf = self.cf(cf::PLAYERS)?;

        let mut batch = WriteBatch::default();
        let mut changed = Vec::new();
        for mut player in self.scan_values::<Player>(cf::PLAYERS)? {
            let last = self.last_activity(&player.id)?;
            if is_inactive(player.status, last, player.created_at, now, window) {
                player.status = PlayerStatus::Inactive;
                player.updated_at = now;
                batch.put_cf(&cf, keys::player_key(&player.id), Self::serialize(&player)?);
                changed.push(player.id);
            }
        }

        if !changed.is_empty() {
            self.write(batch)?;
            info!(count = changed.len(), "Players marked inactive");
        }
        Ok(changed)
    }

    // =========================================================================
    // Payment Tag Operations
    // =========================================================================

    fn put_payment_tag(&self, tag: &PaymentTag) -> Result<()> {
        let _guard = self.lock()?;
        let cf = self.cf(cf::PAYMENT_TAGS)?;
        self.db
            .put_cf(&cf, keys::payment_tag_key(&tag.id), Self::serialize(tag)?)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_payment_tag(&self, tag_id: &PaymentTagId) -> Result<Option<PaymentTag>> {
        self.get_value(cf::PAYMENT_TAGS, &keys::payment_tag_key(tag_id))
    }

    fn list_payment_tags(&self) -> Result<Vec<PaymentTag>> {
        let mut tags: Vec<PaymentTag> = self.scan_values(cf::PAYMENT_TAGS)?;
        tags.sort_by_key(|t| t.created_at);
        Ok(tags)
    }

    fn delete_payment_tag(&self, tag_id: &PaymentTagId) -> Result<()> {
        let _guard = self.lock()?;
        let key = keys::payment_tag_key(tag_id);
        if !self.exists(cf::PAYMENT_TAGS, &key)? {
            return Err(StoreError::not_found("payment tag", tag_id));
        }
        let cf = self.cf(cf::PAYMENT_TAGS)?;
        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    // =========================================================================
    // Staff Operations
    // =========================================================================

    fn put_staff(&self, staff: &Staff) -> Result<()> {
        let _guard = self.lock()?;
        let cf = self.cf(cf::STAFF)?;
        self.db
            .put_cf(&cf, keys::staff_key(&staff.id), Self::serialize(staff)?)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_staff(&self, staff_id: &StaffId) -> Result<Option<Staff>> {
        self.get_value(cf::STAFF, &keys::staff_key(staff_id))
    }

    fn list_staff(&self) -> Result<Vec<Staff>> {
        let mut staff: Vec<Staff> = self.scan_values(cf::STAFF)?;
        staff.sort_by_key(|s| s.name.to_lowercase());
        Ok(staff)
    }

    fn delete_staff(&self, staff_id: &StaffId) -> Result<()> {
        let _guard = self.lock()?;
        let key = keys::staff_key(staff_id);
        if !self.exists(cf::STAFF, &key)? {
            return Err(StoreError::not_found("staff", staff_id));
        }
        let cf = self.cf(cf::STAFF)?;
        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
