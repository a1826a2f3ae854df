//! Selection & submission controller.
//!
//! Tracks which release the operator highlighted, separately from the
//! release that is currently deployed, and gates the deploy action.
//! Selection is never corrected when the history refreshes: a highlighted
//! release that disappears from the store stays selected.

use crate::metrics::METRICS;
use crate::obs::{emit_deploy_submitted, emit_selection_changed};

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// `persist` was invoked with this release name.
    Persisted(String),
    /// A deploy is in flight or the selection is the deployed release.
    Disabled,
    /// Selection was empty; nothing happened.
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionController {
    current_release: String,
    selected: String,
}

impl SelectionController {
    /// Start with the deployed release selected.
    pub fn new(current_release: impl Into<String>) -> Self {
        let current_release = current_release.into();
        Self {
            selected: current_release.clone(),
            current_release,
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn current_release(&self) -> &str {
        &self.current_release
    }

    pub fn is_selected(&self, release_name: &str) -> bool {
        self.selected == release_name
    }

    /// Row checkbox handler.
    ///
    /// Checking selects the row; unchecking (only possible on the selected
    /// row) falls back to the deployed release.
    pub fn toggle_row(&mut self, release_name: &str, checked: bool) {
        self.selected = if checked {
            release_name.to_string()
        } else {
            self.current_release.clone()
        };
        emit_selection_changed(&self.selected);
    }

    /// The deployed release changed (typically after a successful persist).
    pub fn set_current_release(&mut self, release_name: impl Into<String>) {
        self.current_release = release_name.into();
    }

    pub fn submit_enabled(&self, persisting: bool) -> bool {
        !persisting && self.selected != self.current_release
    }

    /// Form submit handler.
    ///
    /// Invokes `persist` at most once with the selected name. The caller
    /// owns the resulting "persisting" flag and any feedback.
    pub fn submit<F>(&self, persisting: bool, persist: F) -> SubmitOutcome
    where
        F: FnOnce(&str),
    {
        if !self.submit_enabled(persisting) {
            return SubmitOutcome::Disabled;
        }
        if self.selected.is_empty() {
            return SubmitOutcome::EmptySelection;
        }
        METRICS.inc_submissions();
        emit_deploy_submitted(&self.selected, &self.current_release);
        persist(&self.selected);
        SubmitOutcome::Persisted(self.selected.clone())
    }
}
