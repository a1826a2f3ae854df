//! Structured observability hooks for the release history view.
//!
//! This module provides:
//! - App-scoped tracing spans via the `AppSpan` RAII guard
//! - Emission functions for fetch, live update, filter, selection and
//!   deploy events
//!
//! Events are emitted at `info!` level except fetch failures (`warn!`) and
//! per-snapshot updates (`debug!`). Set `RELHIST_LOG_FORMAT=json` for JSON
//! output.

use tracing::{debug, info, warn};

/// RAII guard that enters an app-scoped tracing span while it is alive.
///
/// # Example
///
/// ```ignore
/// let _span = AppSpan::enter("web");
/// // every event below is tagged app = "web"
/// ```
pub struct AppSpan {
    _span: tracing::span::EnteredSpan,
}

impl AppSpan {
    pub fn enter(app_name: &str) -> Self {
        let span = tracing::info_span!("relhist.app", app = %app_name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: release list fetch started.
pub fn emit_fetch_started(app_name: &str) {
    info!(event = "history.fetch_started", app = %app_name);
}

/// Emit event: release list fetch failed (warning level).
pub fn emit_fetch_failed(app_name: &str, error: &dyn std::fmt::Display) {
    warn!(event = "history.fetch_failed", app = %app_name, error = %error);
}

/// Emit event: history fetched and watch established.
pub fn emit_history_ready(app_name: &str, releases: usize) {
    info!(event = "history.ready", app = %app_name, releases = releases);
}

pub fn emit_snapshot_applied(app_name: &str, releases: usize) {
    debug!(event = "history.snapshot_applied", app = %app_name, releases = releases);
}

pub fn emit_unsubscribed(app_name: &str) {
    info!(event = "history.unsubscribed", app = %app_name);
}

/// Emit event: a filter checkbox changed and the query was rewritten.
pub fn emit_filter_toggled(tag: &str, checked: bool, search: &str) {
    info!(event = "filter.toggled", tag = %tag, checked = checked, search = %search);
}

pub fn emit_selection_changed(release_name: &str) {
    info!(event = "selection.changed", release = %release_name);
}

/// Emit event: a redeploy was handed to the persist action.
pub fn emit_deploy_submitted(release_name: &str, current_release: &str) {
    info!(
        event = "deploy.submitted",
        release = %release_name,
        current = %current_release,
    );
}
