//! Process-wide counters for the release history view.
//!
//! `live` counts applied snapshots and failed fetches, `selection` counts
//! redeploy submissions. Nothing is logged per increment beyond a trace
//! line; the CLI reports totals once via [`Metrics::flush`] before exit.

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    snapshots_applied: AtomicU64,
    fetch_failures: AtomicU64,
    submissions: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            snapshots_applied: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            submissions: AtomicU64::new(0),
        }
    }

    /// One live snapshot replaced the held history.
    pub fn inc_snapshots_applied(&self) {
        self.snapshots_applied.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "snapshots_applied", "counter incremented");
    }

    pub fn inc_fetch_failures(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fetch_failures", "counter incremented");
    }

    pub fn inc_submissions(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "submissions", "counter incremented");
    }

    /// Report totals as one `info!` event tagged `metric = "flush"`.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            snapshots_applied = self.snapshots_applied(),
            fetch_failures = self.fetch_failures(),
            submissions = self.submissions(),
        );
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.snapshots_applied.store(0, Ordering::Relaxed);
        self.fetch_failures.store(0, Ordering::Relaxed);
        self.submissions.store(0, Ordering::Relaxed);
    }
}
