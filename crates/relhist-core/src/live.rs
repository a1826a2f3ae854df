//! Live reconciliation adapter.
//!
//! Owns the freshness of the release history for one application:
//!
//! ```text
//! Loading ──fetch ok──▶ Ready(history) ◀─┐ snapshot replaces history
//!    │                        └──────────┘
//!    └──fetch err──▶ Failed(error)   (terminal until the next mount)
//! ```
//!
//! The adapter holds at most one [`Subscription`]. It is released on
//! `unmount`, on an application switch, on re-mount and on drop; once
//! released, nothing the backend publishes can reach the held history.
//! Classification and filtering happen elsewhere.

use relhist_state::{Release, ReleaseSource, ReleaseWatcher, StorageError, Subscription};
use tracing::instrument;

use crate::metrics::METRICS;
use crate::obs::{
    emit_fetch_failed, emit_fetch_started, emit_history_ready, emit_snapshot_applied,
    emit_unsubscribed,
};

/// Lifecycle of the fetched release history.
#[derive(Debug)]
pub enum LiveState {
    Loading,
    Ready(Vec<Release>),
    Failed(StorageError),
}

impl LiveState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LiveState::Loading)
    }
}

/// Keeps an application's release history in sync with the backing store.
#[derive(Debug)]
pub struct LiveReleaseHistory {
    app_name: String,
    state: LiveState,
    subscription: Option<Subscription>,
}

impl LiveReleaseHistory {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            state: LiveState::Loading,
            subscription: None,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    /// Current history, newest first, when `Ready`.
    pub fn releases(&self) -> Option<&[Release]> {
        match &self.state {
            LiveState::Ready(releases) => Some(releases),
            _ => None,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Fetch the history and start watching it.
    ///
    /// Any previous subscription is released first. A failed fetch or watch
    /// leaves the adapter in `Failed` with no subscription; no retry is
    /// attempted. Dropping the returned future before it completes leaves
    /// the adapter in `Loading`, unsubscribed.
    #[instrument(skip_all, fields(app = %self.app_name))]
    pub async fn mount(&mut self, source: &dyn ReleaseSource, watcher: &dyn ReleaseWatcher) {
        self.release_subscription();
        self.state = LiveState::Loading;
        emit_fetch_started(&self.app_name);

        let releases = match source.list_releases(&self.app_name).await {
            Ok(releases) => releases,
            Err(err) => return self.fail(err),
        };

        let names: Vec<String> = releases.iter().map(|r| r.name.clone()).collect();
        match watcher.watch(&names) {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(err) => return self.fail(err),
        }

        emit_history_ready(&self.app_name, releases.len());
        self.state = LiveState::Ready(releases);
    }

    /// Apply every snapshot already delivered, oldest first.
    ///
    /// Each snapshot replaces the history wholesale. Returns how many were
    /// applied.
    pub fn apply_pending(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(snapshot) = subscription.try_next() {
            replace_history(&mut self.state, &self.app_name, snapshot);
            applied += 1;
        }
        applied
    }

    /// Wait for the next snapshot and apply it.
    ///
    /// Returns `false` when there is no subscription or the backend stopped
    /// publishing.
    pub async fn next_update(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next().await {
            Some(snapshot) => {
                replace_history(&mut self.state, &self.app_name, snapshot);
                true
            }
            None => false,
        }
    }

    /// Point the adapter at another application.
    ///
    /// On an actual change the subscription is released and the adapter
    /// returns to `Loading`; the caller mounts again. Returns whether the
    /// identity changed.
    pub fn switch_app(&mut self, app_name: &str) -> bool {
        if self.app_name == app_name {
            return false;
        }
        self.release_subscription();
        self.app_name = app_name.to_string();
        self.state = LiveState::Loading;
        true
    }

    /// Stop watching. The held history stays as it was.
    pub fn unmount(&mut self) {
        self.release_subscription();
    }

    fn fail(&mut self, err: StorageError) {
        METRICS.inc_fetch_failures();
        emit_fetch_failed(&self.app_name, &err);
        self.state = LiveState::Failed(err);
    }

    fn release_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            emit_unsubscribed(&self.app_name);
        }
    }
}

impl Drop for LiveReleaseHistory {
    fn drop(&mut self) {
        self.release_subscription();
    }
}

fn replace_history(state: &mut LiveState, app_name: &str, snapshot: Vec<Release>) {
    METRICS.inc_snapshots_applied();
    emit_snapshot_applied(app_name, snapshot.len());
    *state = LiveState::Ready(snapshot);
}
