//! Render-ready view of the release history.
//!
//! Everything the host UI draws comes out of [`HistoryView::build`]: the
//! two filter checkboxes, one row per visible release, and the deploy
//! button. The view is recomputed from scratch on every render; it holds no
//! state of its own.

use std::collections::BTreeMap;

use relhist_state::Release;
use serde::Serialize;

use crate::domain::{FilterTag, ReleaseKind, Result};
use crate::env_diff::{diff_env, EnvDiff};
use crate::filter::FilterSet;
use crate::live::{LiveReleaseHistory, LiveState};
use crate::projector::project;
use crate::selection::SelectionController;

pub const DEPLOY_LABEL: &str = "Deploy Release";
pub const DEPLOYING_LABEL: &str = "Deploying...";

/// One visible release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRow {
    pub name: String,
    /// Last segment of the name.
    pub label: String,
    pub git_commit: Option<String>,
    pub kind: ReleaseKind,
    pub selected: bool,
    /// Environment delta against the true predecessor.
    pub env_diff: EnvDiff,
}

/// Checked state of the `code` / `env` filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterToggles {
    pub code: bool,
    pub env: bool,
}

impl FilterToggles {
    pub fn from_filters(filters: &FilterSet) -> Self {
        Self {
            code: filters.contains(FilterTag::Code),
            env: filters.contains(FilterTag::Env),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButton {
    pub enabled: bool,
    pub label: &'static str,
}

impl SubmitButton {
    pub fn new(selection: &SelectionController, persisting: bool) -> Self {
        Self {
            enabled: selection.submit_enabled(persisting),
            label: if persisting { DEPLOYING_LABEL } else { DEPLOY_LABEL },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryView {
    Loading,
    /// Warning notice carrying the fetch error's description.
    Failed { message: String },
    Ready {
        filters: FilterToggles,
        rows: Vec<ReleaseRow>,
        selected: String,
        submit: SubmitButton,
    },
}

impl HistoryView {
    /// Build the view for the current adapter state and query string.
    pub fn build(
        live: &LiveReleaseHistory,
        search: &str,
        selection: &SelectionController,
        persisting: bool,
    ) -> Self {
        match live.state() {
            LiveState::Loading => HistoryView::Loading,
            LiveState::Failed(err) => HistoryView::Failed {
                message: err.to_string(),
            },
            LiveState::Ready(history) => {
                let filters = FilterSet::decode(search);
                HistoryView::Ready {
                    filters: FilterToggles::from_filters(&filters),
                    rows: release_rows(history, &filters, selection),
                    selected: selection.selected().to_string(),
                    submit: SubmitButton::new(selection, persisting),
                }
            }
        }
    }

    /// Pretty-printed JSON, tagged by `state`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Rows for the releases that pass `filters`, newest first.
pub fn release_rows(
    history: &[Release],
    filters: &FilterSet,
    selection: &SelectionController,
) -> Vec<ReleaseRow> {
    let no_env = BTreeMap::new();
    project(history, filters)
        .into_iter()
        .map(|pair| ReleaseRow {
            name: pair.release.name.clone(),
            label: pair.release.label().to_string(),
            git_commit: pair.release.git_commit().map(str::to_string),
            kind: pair.kind,
            selected: selection.is_selected(&pair.release.name),
            env_diff: diff_env(pair.prev.map_or(&no_env, |p| &p.env), &pair.release.env),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relhist_state::GIT_COMMIT_LABEL;

    #[test]
    fn rows_carry_label_commit_and_selection() {
        let history = vec![
            Release::new("apps/web/releases/2")
                .with_artifacts(["img:2"])
                .with_label(GIT_COMMIT_LABEL, "abc123"),
            Release::new("apps/web/releases/1")
                .with_artifacts(["img:1"])
                .with_env("PORT", "80"),
        ];
        let selection = SelectionController::new("apps/web/releases/1");

        let rows = release_rows(&history, &FilterSet::default_view(), &selection);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "2");
        assert_eq!(rows[0].git_commit.as_deref(), Some("abc123"));
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        assert_eq!(rows[1].git_commit, None);
    }

    #[test]
    fn submit_button_label_tracks_persisting() {
        let selection = SelectionController::new("a");
        assert_eq!(SubmitButton::new(&selection, true).label, DEPLOYING_LABEL);
        assert_eq!(SubmitButton::new(&selection, false).label, DEPLOY_LABEL);
    }

    #[test]
    fn loading_adapter_builds_loading_view() {
        let live = LiveReleaseHistory::new("web");
        let selection = SelectionController::new("a");
        assert_eq!(
            HistoryView::build(&live, "", &selection, false),
            HistoryView::Loading
        );
    }

    #[test]
    fn view_json_is_tagged_by_state() {
        let failed = HistoryView::Failed {
            message: "application not found: web".into(),
        };

        let json = failed.to_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

        assert_eq!(value["state"], "failed");
        assert_eq!(value["message"], "application not found: web");
        assert_eq!(
            HistoryView::Loading.to_json().expect("json"),
            "{\n  \"state\": \"loading\"\n}"
        );
    }
}
