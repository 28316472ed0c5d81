//! Player inactivity rule.

use chrono::{DateTime, Duration, Utc};

use crate::PlayerStatus;

/// Default trailing window, in seconds, without ledger activity before a
/// player turns inactive.
pub const DEFAULT_INACTIVITY_WINDOW_SECS: i64 = 300;

/// Whether an active player should be marked inactive.
///
/// `last_activity` is the newest ledger entry for the player; players with no
/// entries are measured from `joined_at`. Only `Active` players transition.
#[must_use]
pub fn is_inactive(
    status: PlayerStatus,
    last_activity: Option<DateTime<Utc>>,
    joined_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    if status != PlayerStatus::Active {
        return false;
    }
    let reference = last_activity.unwrap_or(joined_at);
    now.signed_duration_since(reference) > window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::seconds(DEFAULT_INACTIVITY_WINDOW_SECS)
    }

    #[test]
    fn recent_activity_keeps_player_active() {
        let now = Utc::now();
        let joined = now - Duration::days(30);
        let last = Some(now - Duration::minutes(2));
        assert!(!is_inactive(
            PlayerStatus::Active,
            last,
            joined,
            now,
            window()
        ));
    }

    #[test]
    fn stale_activity_marks_inactive() {
        let now = Utc::now();
        let joined = now - Duration::days(30);
        let last = Some(now - Duration::minutes(6));
        assert!(is_inactive(
            PlayerStatus::Active,
            last,
            joined,
            now,
            window()
        ));
    }

    #[test]
    fn falls_back_to_join_date() {
        let now = Utc::now();
        assert!(!is_inactive(
            PlayerStatus::Active,
            None,
            now - Duration::minutes(1),
            now,
            window()
        ));
        assert!(is_inactive(
            PlayerStatus::Active,
            None,
            now - Duration::hours(1),
            now,
            window()
        ));
    }

    #[test]
    fn only_active_players_transition() {
        let now = Utc::now();
        let old = now - Duration::days(1);
        for status in [PlayerStatus::Inactive, PlayerStatus::Blocked] {
            assert!(!is_inactive(status, None, old, now, window()));
        }
    }
}
