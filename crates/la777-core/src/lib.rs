//! Core types and rules for the LA777 back office.
//!
//! This crate provides the domain model shared by the store and the HTTP service:
//!
//! - **Identifiers**: `PlayerId`, `GameId`, `TransactionId`, `PaymentTagId`, `StaffId`
//! - **Records**: `Player`, `Game`, `Transaction`, `PaymentTag`, `Staff`
//! - **Transfers**: `TransferPlan`, `ReversalPlan`, the rules for moving money
//!   between a game balance and a player's running totals
//! - **Activity**: the inactivity rule used by the sweep
//! - **Reports**: `LedgerSummary`
//!
//! # Money
//!
//! All amounts are integer cents (`i64`). `$200.00` is `20000`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod activity;
pub mod error;
pub mod game;
pub mod ids;
pub mod ledger;
pub mod payment_tag;
pub mod player;
pub mod report;
pub mod staff;
pub mod transfer;

pub use activity::{is_inactive, DEFAULT_INACTIVITY_WINDOW_SECS};
pub use error::{LedgerError, Result};
pub use game::{validate_game_name, Game, RechargeEntry, RechargeKind};
pub use ids::{GameId, IdError, PaymentTagId, PlayerId, StaffId, TransactionId};
pub use ledger::{Transaction, TransactionStatus, TransactionType};
pub use payment_tag::{validate_tag, PaymentTag, PaymentTagStatus};
pub use player::{GamingAccount, Player, PlayerStats, PlayerStatus};
pub use report::{LedgerSummary, Totals};
pub use staff::{Staff, StaffRole, StaffStatus};
pub use transfer::{
    deposit_bonus, stats_delta, CreditType, ReversalPlan, TransferKind, TransferPlan,
    TransferRequest,
};
