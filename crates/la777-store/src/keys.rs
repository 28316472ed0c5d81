//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use la777_core::{GameId, PaymentTagId, PlayerId, StaffId, TransactionId};

/// Create a player key from a player ID.
#[must_use]
pub fn player_key(player_id: &PlayerId) -> Vec<u8> {
    player_id.as_bytes().to_vec()
}

/// Create a game key from a game ID.
#[must_use]
pub fn game_key(game_id: &GameId) -> Vec<u8> {
    game_id.as_bytes().to_vec()
}

/// Create a name-index key. Names are matched exactly.
#[must_use]
pub fn game_name_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Decode a game id stored as an index value.
#[must_use]
pub fn decode_game_id(value: &[u8]) -> Option<GameId> {
    let bytes: [u8; 16] = value.try_into().ok()?;
    Some(GameId::from_bytes(bytes))
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create an owner-transaction index key.
///
/// Format: `owner_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, an owner's entries are sorted by time.
#[must_use]
pub fn owner_transaction_key(owner: &[u8; 16], transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(owner);
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the transaction ID from an owner-transaction index key.
#[must_use]
pub fn extract_transaction_id(key: &[u8]) -> Option<TransactionId> {
    let bytes: [u8; 16] = key.get(16..32)?.try_into().ok()?;
    Some(TransactionId::from_bytes(bytes))
}

/// Create a referral payout key.
///
/// Format: `referrer_id (16 bytes) || referred_id (16 bytes)`
#[must_use]
pub fn referral_key(referrer: &PlayerId, referred: &PlayerId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(referrer.as_bytes());
    key.extend_from_slice(referred.as_bytes());
    key
}

/// Create a payment tag key.
#[must_use]
pub fn payment_tag_key(tag_id: &PaymentTagId) -> Vec<u8> {
    tag_id.as_bytes().to_vec()
}

/// Create a staff key from the staff uid.
#[must_use]
pub fn staff_key(staff_id: &StaffId) -> Vec<u8> {
    staff_id.as_str().as_bytes().to_vec()
}
