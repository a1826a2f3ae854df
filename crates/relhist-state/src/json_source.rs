//! Release source backed by a JSON document on disk.
//!
//! The document maps application names to their release histories, newest
//! first:
//!
//! ```json
//! { "web": [ { "name": "apps/web/releases/2", "artifacts": ["img@sha256:…"] } ] }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::storage_traits::{Release, ReleaseSource, ReleaseWatcher, StorageResult, Subscription};

/// Reads release histories from a JSON file on every listing.
#[derive(Debug, Clone)]
pub struct JsonFileReleaseSource {
    path: PathBuf,
}

impl JsonFileReleaseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReleaseSource for JsonFileReleaseSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list_releases(&self, app_name: &str) -> StorageResult<Vec<Release>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let mut apps: HashMap<String, Vec<Release>> = serde_json::from_str(&raw)?;
        debug!(apps = apps.len(), "release file parsed");
        apps.remove(app_name).ok_or_else(|| StorageError::AppNotFound {
            app_name: app_name.to_string(),
        })
    }
}

/// A file is a point-in-time document: the watch registers nothing and its
/// subscription reports end-of-stream straight away.
impl ReleaseWatcher for JsonFileReleaseSource {
    fn watch(&self, names: &[String]) -> StorageResult<Subscription> {
        let (_tx, rx) = mpsc::unbounded_channel();
        Ok(Subscription::new(names.to_vec(), rx, || {}))
    }
}
