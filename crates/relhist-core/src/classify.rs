//! Release classifier.
//!
//! A release is a *code* release when its artifacts differ from those of its
//! immediate predecessor, and an *env* release otherwise. The oldest release
//! has no predecessor and counts as code unless it carries no artifacts.

use relhist_state::Release;

use crate::domain::ReleaseKind;

/// Classify `release` against its true predecessor.
pub fn classify(release: &Release, prev: Option<&Release>) -> ReleaseKind {
    let changed = match prev {
        Some(prev) => prev.artifacts != release.artifacts,
        None => !release.artifacts.is_empty(),
    };
    if changed {
        ReleaseKind::Code
    } else {
        ReleaseKind::Env
    }
}

pub fn is_code_release(release: &Release, prev: Option<&Release>) -> bool {
    classify(release, prev) == ReleaseKind::Code
}

pub fn is_env_release(release: &Release, prev: Option<&Release>) -> bool {
    !is_code_release(release, prev)
}
