//! Environment deltas between a release and its predecessor.
//!
//! Rows of the history view show which variables an env release touched.
//! The oldest release has no predecessor and diffs against an empty map.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// Change to a single environment variable between two releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EnvChange {
    Added { key: String, value: String },
    Removed { key: String, value: String },
    Changed { key: String, before: String, after: String },
    Unchanged { key: String, value: String },
}

impl EnvChange {
    pub fn key(&self) -> &str {
        match self {
            EnvChange::Added { key, .. }
            | EnvChange::Removed { key, .. }
            | EnvChange::Changed { key, .. }
            | EnvChange::Unchanged { key, .. } => key,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, EnvChange::Unchanged { .. })
    }
}

/// `+ K=V` added, `- K=V` removed, `~ K=old => new` changed, `  K=V` unchanged.
impl fmt::Display for EnvChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvChange::Added { key, value } => write!(f, "+ {key}={value}"),
            EnvChange::Removed { key, value } => write!(f, "- {key}={value}"),
            EnvChange::Changed { key, before, after } => write!(f, "~ {key}={before} => {after}"),
            EnvChange::Unchanged { key, value } => write!(f, "  {key}={value}"),
        }
    }
}

/// Per-key comparison of two environments, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvDiff {
    pub changes: Vec<EnvChange>,
}

impl EnvDiff {
    /// True when some key was added, removed or changed.
    pub fn has_changes(&self) -> bool {
        !self.changes.iter().all(EnvChange::is_unchanged)
    }
}

/// Diff `prev` against `current`, one entry per key in either map.
pub fn diff_env(prev: &BTreeMap<String, String>, current: &BTreeMap<String, String>) -> EnvDiff {
    let keys: BTreeSet<&String> = prev.keys().chain(current.keys()).collect();
    let changes = keys
        .into_iter()
        .map(|key| match (prev.get(key), current.get(key)) {
            (None, Some(value)) => EnvChange::Added {
                key: key.clone(),
                value: value.clone(),
            },
            (Some(value), None) => EnvChange::Removed {
                key: key.clone(),
                value: value.clone(),
            },
            (Some(before), Some(after)) if before != after => EnvChange::Changed {
                key: key.clone(),
                before: before.clone(),
                after: after.clone(),
            },
            (_, value) => EnvChange::Unchanged {
                key: key.clone(),
                value: value.cloned().unwrap_or_default(),
            },
        })
        .collect();
    EnvDiff { changes }
}

/// Text rendering, one line per variable.
pub fn render_env_diff(
    prev: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
) -> Vec<String> {
    diff_env(prev, current)
        .changes
        .iter()
        .map(ToString::to_string)
        .collect()
}
