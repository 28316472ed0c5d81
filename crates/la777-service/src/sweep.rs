//! Background inactivity sweep.
//!
//! Players without a ledger entry inside the configured window move from
//! active to inactive. The sweep runs on a fixed interval for the life of the
//! process and can also be triggered over HTTP.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use la777_store::{RocksStore, Store};

use crate::state::AppState;

/// Start the periodic sweep. Returns `None` when the interval is zero.
#[must_use]
pub fn spawn_inactivity_sweep(state: &AppState) -> Option<JoinHandle<()>> {
    let interval_secs = state.config.sweep_interval_seconds;
    if interval_secs == 0 {
        tracing::info!("Inactivity sweep disabled");
        return None;
    }

    let store = Arc::clone(&state.store);
    let window = state.config.inactivity_window();
    tracing::info!(
        interval_secs,
        window_secs = window.num_seconds(),
        "Inactivity sweep scheduled"
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let store = Arc::clone(&store);
            let result =
                tokio::task::spawn_blocking(move || sweep_once(&store, Utc::now(), window)).await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Inactivity sweep task failed");
            }
        }
    }))
}

/// Run one sweep pass and return how many players changed.
pub fn sweep_once(store: &RocksStore, now: DateTime<Utc>, window: chrono::Duration) -> usize {
    match store.mark_inactive_players(now, window) {
        Ok(changed) => {
            if !changed.is_empty() {
                tracing::debug!(count = changed.len(), "Inactivity sweep pass complete");
            }
            changed.len()
        }
        Err(e) => {
            tracing::error!(error = %e, "Inactivity sweep failed");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use la777_core::{Player, PlayerStatus};
    use tempfile::TempDir;

    fn state(sweep_interval_seconds: u64) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let config = ServiceConfig {
            sweep_interval_seconds,
            ..ServiceConfig::default()
        };
        (AppState::new(store, config), dir)
    }

    #[tokio::test]
    async fn zero_interval_disables_task() {
        let (state, _dir) = state(0);
        assert!(spawn_inactivity_sweep(&state).is_none());
    }

    #[test]
    fn sweep_once_marks_idle_players() {
        let (state, _dir) = state(60);
        let player = Player::new("Idle", "https://facebook.com/idle", None).unwrap();
        state.store.create_player(&player).unwrap();

        let window = state.config.inactivity_window();
        assert_eq!(sweep_once(&state.store, Utc::now(), window), 0);
        let later = Utc::now() + chrono::Duration::minutes(6);
        assert_eq!(sweep_once(&state.store, later, window), 1);

        let player = state.store.get_player(&player.id).unwrap().unwrap();
        assert_eq!(player.status, PlayerStatus::Inactive);
    }
}
