//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryReleaseStore`, which satisfies both the `ReleaseSource`
//! and `ReleaseWatcher` contracts without any external dependencies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::StorageError;
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryReleaseStore
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Watch {
    names: Vec<String>,
    tx: mpsc::UnboundedSender<Vec<Release>>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Releases per application, newest first.
    apps: HashMap<String, Vec<Release>>,
    watches: HashMap<u64, Watch>,
    next_watch_id: u64,
    fail_next_list: Option<String>,
    closed: bool,
}

impl StoreState {
    fn find(&self, name: &str) -> Option<&Release> {
        self.apps
            .values()
            .flat_map(|releases| releases.iter())
            .find(|r| r.name == name)
    }

    /// Push the current snapshot to every watch, forgetting watches whose
    /// receiver has gone away.
    fn notify(&mut self) {
        let snapshots: Vec<(u64, Vec<Release>)> = self
            .watches
            .iter()
            .map(|(id, watch)| {
                let snapshot = watch
                    .names
                    .iter()
                    .filter_map(|name| self.find(name).cloned())
                    .collect();
                (*id, snapshot)
            })
            .collect();

        for (id, snapshot) in snapshots {
            let delivered = self
                .watches
                .get(&id)
                .map(|w| w.tx.send(snapshot).is_ok())
                .unwrap_or(false);
            if !delivered {
                self.watches.remove(&id);
            }
        }
    }
}

/// In-memory release store backed by a `HashMap<app, releases>`.
///
/// Every mutation publishes a full snapshot to each live watch.
#[derive(Debug, Default, Clone)]
pub struct MemoryReleaseStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryReleaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an application's history (newest first) without notifying.
    pub fn with_app(self, app_name: &str, releases: Vec<Release>) -> Self {
        self.state
            .lock()
            .unwrap()
            .apps
            .insert(app_name.to_string(), releases);
        self
    }

    /// Replace an application's whole history.
    pub fn set_releases(&self, app_name: &str, releases: Vec<Release>) {
        let mut state = self.state.lock().unwrap();
        state.apps.insert(app_name.to_string(), releases);
        state.notify();
    }

    /// Record a new release as the most recent one of `app_name`.
    pub fn push_release(&self, app_name: &str, release: Release) {
        let mut state = self.state.lock().unwrap();
        state
            .apps
            .entry(app_name.to_string())
            .or_default()
            .insert(0, release);
        state.notify();
    }

    /// Replace the release with the same name, wherever it lives.
    pub fn update_release(&self, release: Release) -> bool {
        let mut state = self.state.lock().unwrap();
        let slot = state
            .apps
            .values_mut()
            .flat_map(|releases| releases.iter_mut())
            .find(|r| r.name == release.name);
        match slot {
            Some(slot) => {
                *slot = release;
                state.notify();
                true
            }
            None => false,
        }
    }

    /// Delete a release by name.
    pub fn remove_release(&self, name: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        let mut removed = false;
        for releases in state.apps.values_mut() {
            let before = releases.len();
            releases.retain(|r| r.name != name);
            removed |= releases.len() != before;
        }
        if removed {
            state.notify();
        }
        removed
    }

    /// Make the next `list_releases` call fail with a backend error.
    pub fn fail_next_list(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_next_list = Some(message.into());
    }

    /// Shut the store's publisher down: live watches end and new ones are
    /// refused with `SubscriptionClosed`. Listing keeps working.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        state.watches.clear();
    }

    /// Number of watches currently registered.
    pub fn watch_count(&self) -> usize {
        self.state.lock().unwrap().watches.len()
    }
}

#[async_trait]
impl ReleaseSource for MemoryReleaseStore {
    async fn list_releases(&self, app_name: &str) -> StorageResult<Vec<Release>> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_next_list.take() {
            return Err(StorageError::Backend(message));
        }
        state
            .apps
            .get(app_name)
            .cloned()
            .ok_or_else(|| StorageError::AppNotFound {
                app_name: app_name.to_string(),
            })
    }
}

impl ReleaseWatcher for MemoryReleaseStore {
    fn watch(&self, names: &[String]) -> StorageResult<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(StorageError::SubscriptionClosed);
            }
            let id = state.next_watch_id;
            state.next_watch_id += 1;
            state.watches.insert(
                id,
                Watch {
                    names: names.to_vec(),
                    tx,
                },
            );
            id
        };
        debug!(watch_id = id, names = names.len(), "watch registered");

        let store: Weak<Mutex<StoreState>> = Arc::downgrade(&self.state);
        Ok(Subscription::new(names.to_vec(), rx, move || {
            if let Some(state) = store.upgrade() {
                if let Ok(mut state) = state.lock() {
                    state.watches.remove(&id);
                }
            }
            debug!(watch_id = id, "watch released");
        }))
    }
}
