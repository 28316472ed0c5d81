//! Player records and their running statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::PlayerId;

/// A player managed by staff.
///
/// `stats` is only ever changed by a balance transfer or its reversal; staff
/// edits go through the profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player id.
    pub id: PlayerId,

    /// Display name. Unique in practice, not enforced.
    pub name: String,

    /// Facebook profile URL.
    pub facebook_url: String,

    /// Optional avatar image URL.
    pub avatar_url: Option<String>,

    /// Name of the player who referred this one.
    pub referred_by: Option<String>,

    /// Account status.
    pub status: PlayerStatus,

    /// Running totals maintained by balance transfers.
    pub stats: PlayerStats,

    /// Accounts held on individual games, at most one per game name.
    pub gaming_accounts: Vec<GamingAccount>,

    /// When a transfer last touched this player.
    pub last_activity_at: Option<DateTime<Utc>>,

    /// Join date.
    pub created_at: DateTime<Utc>,

    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Create an active player with zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a blank name or a malformed profile URL.
    pub fn new(
        name: impl Into<String>,
        facebook_url: impl Into<String>,
        referred_by: Option<String>,
    ) -> Result<Self> {
        let name = validate_name(name.into())?;
        let facebook_url = validate_profile_url(facebook_url.into())?;
        let now = Utc::now();

        Ok(Self {
            id: PlayerId::generate(),
            name,
            facebook_url,
            avatar_url: None,
            referred_by: referred_by
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            status: PlayerStatus::Active,
            stats: PlayerStats::default(),
            gaming_accounts: Vec::new(),
            last_activity_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rename the player.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the name is blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    /// Replace the profile URL.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the URL is malformed.
    pub fn set_facebook_url(&mut self, url: impl Into<String>) -> Result<()> {
        self.facebook_url = validate_profile_url(url.into())?;
        Ok(())
    }

    /// Find the account this player holds on a game.
    #[must_use]
    pub fn gaming_account(&self, game_name: &str) -> Option<&GamingAccount> {
        self.gaming_accounts
            .iter()
            .find(|a| a.game_name == game_name)
    }

    /// Attach an account on a game.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateGamingAccount` if the player already has
    /// an account on that game, or `Validation` for blank fields.
    pub fn add_gaming_account(&mut self, account: GamingAccount) -> Result<()> {
        if account.game_name.trim().is_empty() || account.gamer_id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "game name and gamer id are required".into(),
            ));
        }
        if self.gaming_account(&account.game_name).is_some() {
            return Err(LedgerError::DuplicateGamingAccount {
                game_name: account.game_name,
            });
        }
        self.gaming_accounts.push(account);
        Ok(())
    }

    /// Drop every account on the named game. Returns whether anything changed.
    pub fn remove_gaming_account(&mut self, game_name: &str) -> bool {
        let before = self.gaming_accounts.len();
        self.gaming_accounts.retain(|a| a.game_name != game_name);
        self.gaming_accounts.len() != before
    }

    /// Point accounts on `old` at `new`. Returns whether anything changed.
    pub fn rename_gaming_accounts(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        for account in &mut self.gaming_accounts {
            if account.game_name == old {
                account.game_name = new.to_string();
                changed = true;
            }
        }
        changed
    }
}

/// Player account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Recently active.
    Active,

    /// No ledger activity within the inactivity window.
    Inactive,

    /// Blocked by staff.
    Blocked,
}

/// Running totals for one player, all in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Total freeplay credit granted.
    pub t_free_play_cents: i64,
    /// Total deposited, excluding bonus.
    pub t_deposit_cents: i64,
    /// Total withdrawn.
    pub t_withdraw_cents: i64,
    /// Total bonusplay credit granted.
    pub t_bonus_play_cents: i64,
    /// Total referral bonuses earned.
    pub t_referral_bonus_cents: i64,
    /// Total deposit bonus paid on top of deposits.
    pub t_deposit_bonus_cents: i64,
    /// Deposits minus withdrawals.
    pub p_and_l_cents: i64,
}

/// A player's login on one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamingAccount {
    /// Game name this account belongs to.
    pub game_name: String,
    /// The player's id on that game.
    pub gamer_id: String,
}

fn validate_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("name is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Accepts `http(s)://host/...` URLs.
fn validate_profile_url(url: String) -> Result<String> {
    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| LedgerError::Validation("profile URL must be http(s)".into()))?;

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || !host.contains('.') || host.contains(char::is_whitespace) {
        return Err(LedgerError::Validation("profile URL has no valid host".into()));
    }
    Ok(trimmed.to_string())
}
