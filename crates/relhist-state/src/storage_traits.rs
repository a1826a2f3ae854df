//! Storage trait definitions for relhist
//!
//! These traits define the backend boundary of the release history view:
//! - `ReleaseSource`: one-shot listing of an application's releases
//! - `ReleaseWatcher`: live subscription keyed by release names
//!
//! `ReleaseSource` is async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Label key carrying the source commit a release was built from.
pub const GIT_COMMIT_LABEL: &str = "git.commit";

// ---------------------------------------------------------------------------
// Release
// ---------------------------------------------------------------------------

/// A deployable version of an application.
///
/// Releases are never mutated in place: the backend publishes a new value
/// whenever anything about a release changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Hierarchical identifier, e.g. `apps/web/releases/42`
    pub name: String,
    /// Code artifacts, compared element-wise and in order
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Metadata labels (may include `git.commit`)
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Environment variables
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Release {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifacts: Vec::new(),
            labels: BTreeMap::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_artifacts<I, S>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artifacts = artifacts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Display label: the last `/`-separated segment of the name.
    pub fn label(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// The `git.commit` label, if set and non-empty.
    pub fn git_commit(&self) -> Option<&str> {
        self.labels
            .get(GIT_COMMIT_LABEL)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

// ---------------------------------------------------------------------------
// ReleaseSource: one-shot listing
// ---------------------------------------------------------------------------

/// Lists the release history of an application.
///
/// Guarantees:
/// - Releases are returned most-recent-first; `releases[i + 1]` is the
///   predecessor of `releases[i]`.
/// - The future resolves exactly once, to the list or to an error.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// List all releases of `app_name`, newest first.
    async fn list_releases(&self, app_name: &str) -> StorageResult<Vec<Release>>;
}

// ---------------------------------------------------------------------------
// ReleaseWatcher: live snapshots
// ---------------------------------------------------------------------------

/// Live view over a set of releases in the backing store.
///
/// Semantics:
/// - Every change to a watched release emits the full current array of the
///   watched releases that still exist, in watch order. Emissions are never
///   incremental diffs.
/// - Emissions are delivered in order through the returned [`Subscription`].
/// - Dropping the subscription unregisters it before `drop` returns.
pub trait ReleaseWatcher: Send + Sync {
    /// Watch the releases identified by `names`.
    fn watch(&self, names: &[String]) -> StorageResult<Subscription>;
}

/// Scoped handle on a live release watch.
///
/// Snapshots queue up in an unbounded channel until read with
/// [`Subscription::try_next`] or [`Subscription::next`]. Releasing the
/// handle (explicitly or by dropping it) runs the backend's unregister hook
/// and discards anything still queued.
pub struct Subscription {
    names: Vec<String>,
    updates: mpsc::UnboundedReceiver<Vec<Release>>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Build a subscription from its snapshot channel and the hook that
    /// unregisters the sender from the backend.
    pub fn new(
        names: Vec<String>,
        updates: mpsc::UnboundedReceiver<Vec<Release>>,
        on_release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            names,
            updates,
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Release names this subscription is keyed by.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Next already-delivered snapshot, without waiting.
    pub fn try_next(&mut self) -> Option<Vec<Release>> {
        self.updates.try_recv().ok()
    }

    /// Wait for the next snapshot. `None` once the backend stops publishing.
    pub async fn next(&mut self) -> Option<Vec<Release>> {
        self.updates.recv().await
    }

    /// Unregister from the backend. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    fn release(&mut self) {
        if let Some(hook) = self.on_release.take() {
            self.updates.close();
            hook();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("names", &self.names)
            .field("released", &self.on_release.is_none())
            .finish()
    }
}
