//! Store - owns the current snapshot, runs the reducer and broadcasts results

use std::sync::Arc;
use tokio::sync::watch;

use crate::app::state::AppState;
use crate::messages::actions::{Action, UserUpdate};
use crate::storage::PreferenceCache;

/// Holds the current snapshot and notifies subscribers after every change
pub struct Store {
    state: Arc<AppState>,
    cache: Option<PreferenceCache>,
    snapshot_tx: watch::Sender<Arc<AppState>>,
}

impl Store {
    pub fn new(initial: AppState, cache: Option<PreferenceCache>) -> Self {
        let state = Arc::new(initial);
        let (snapshot_tx, _) = watch::channel(state.clone());
        Store {
            state,
            cache,
            snapshot_tx,
        }
    }

    /// Build a store from `initial`, then restore the cached user.
    ///
    /// Only the user is read back; a cached theme is ignored. A cache entry
    /// that cannot be decoded is logged and the defaults are kept.
    pub fn restore(initial: AppState, cache: PreferenceCache) -> Self {
        let cached = match cache.load() {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved state");
                None
            }
        };
        let mut store = Store::new(initial, Some(cache));
        if let Some(user) = cached.and_then(|entry| entry.user) {
            store.dispatch(Action::UpdateUser(vec![UserUpdate::Replace(user)]));
        }
        store
    }

    /// The current snapshot
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Receive every snapshot produced from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshot_tx.subscribe()
    }

    /// Apply an action synchronously and broadcast the new snapshot
    pub fn dispatch(&mut self, action: Action) {
        let next = self.state.reduce(&action);
        if next == *self.state {
            tracing::trace!(action = action.name(), "Action left state unchanged");
            return;
        }

        let persist = next.user != self.state.user || next.theme != self.state.theme;
        self.state = Arc::new(next);
        if persist {
            self.persist();
        }
        self.snapshot_tx.send_replace(self.state.clone());
    }

    fn persist(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&self.state.user, self.state.theme) {
                tracing::warn!(error = %e, "Failed to save state");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use crate::models::Theme;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_subscribers_see_new_snapshot() {
        let mut store = Store::new(AppState::new(), None);
        let mut rx = store.subscribe();
        store.dispatch(Action::SetTheme(Theme::Light));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().theme, Theme::Light);
    }

    #[test]
    fn test_noop_action_does_not_broadcast() {
        let mut store = Store::new(AppState::new(), None);
        let rx = store.subscribe();
        store.dispatch(Action::DeleteTransfer(String::from("missing")));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_user_change_is_persisted() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path());
        let mut store = Store::new(AppState::new(), Some(cache.clone()));
        store.dispatch(Action::UpdateUser(vec![UserUpdate::Username(String::from("Neo"))]));

        let entry = cache.load().unwrap().unwrap();
        assert_eq!(entry.user.unwrap().username, "Neo");
        assert_eq!(entry.theme, Some(Theme::Dark));
    }

    #[test]
    fn test_transfer_change_is_not_persisted() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path());
        let mut store = Store::new(AppState::new(), Some(cache.clone()));
        store.dispatch(Action::DeleteTransfer(String::from("1")));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_reload_restores_user_but_not_theme() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path());

        let mut store = Store::restore(AppState::new(), cache.clone());
        store.dispatch(Action::UpdateUser(vec![UserUpdate::Username(String::from("Neo"))]));
        store.dispatch(Action::SetTheme(Theme::Light));
        let before = store.state();

        let reloaded = Store::restore(AppState::new(), cache);
        assert_eq!(reloaded.state().user, before.user);
        // The cached theme is written but never read back.
        assert_eq!(reloaded.state().theme, Theme::Dark);
    }

    #[test]
    fn test_malformed_cache_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path());
        fs::write(cache.path(), "][").unwrap();

        let store = Store::restore(AppState::new(), cache);
        assert_eq!(store.state().user, mock::user());
    }
}
