//! LA777 back-office HTTP API.
//!
//! This crate exposes the balance-transfer ledger to cashiers and admins:
//!
//! - Player records, gaming accounts and referrals
//! - Game balances with rename and delete cascades
//! - Deposits, withdrawals, credits and referral payouts
//! - Reversal of ledger entries
//! - Payment tags, staff mirror records and ledger reports
//!
//! # Authentication
//!
//! Every `/v1` route expects an HS256 bearer token carrying the staff uid,
//! name and role. A mirror staff record, when present, overrides the token's
//! role and can block the account. `POST /api/change-password` is public and
//! re-authenticates against the identity provider instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers stay async to satisfy the router

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod routes;
pub mod state;
pub mod sweep;

pub use auth::{StaffAuth, StaffClaims};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use identity::{IdentityClient, IdentityError};
pub use routes::create_router;
pub use state::AppState;
pub use sweep::spawn_inactivity_sweep;
