//! History projector: classify, filter and pair releases for rendering.

use relhist_state::Release;

use crate::classify::classify;
use crate::domain::ReleaseKind;
use crate::filter::FilterSet;

/// A release that survived filtering, with its true predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePair<'a> {
    pub release: &'a Release,
    /// `history[index + 1]` in the unfiltered history, whether or not it
    /// is itself visible.
    pub prev: Option<&'a Release>,
    pub kind: ReleaseKind,
    /// Position of `release` in the unfiltered history.
    pub index: usize,
}

/// Project `history` (newest first) through `filters`.
///
/// Output preserves history order. An empty filter set yields nothing.
pub fn project<'a>(history: &'a [Release], filters: &FilterSet) -> Vec<ReleasePair<'a>> {
    history
        .iter()
        .enumerate()
        .filter_map(|(index, release)| {
            let prev = history.get(index + 1);
            let kind = classify(release, prev);
            filters.iter().any(|tag| tag.matches(kind)).then_some(ReleasePair {
                release,
                prev,
                kind,
                index,
            })
        })
        .collect()
}
