//! History projection tests: classification, filtering and true-predecessor
//! pairing over whole histories.

use proptest::prelude::*;
use relhist_core::{classify, project, FilterSet, FilterTag, Release, ReleaseKind};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn filters(tags: &[FilterTag]) -> FilterSet {
    tags.iter().copied().collect()
}

/// R3 repeats R2's artifacts, R2 changes them, R1 is the oldest and empty.
fn three_release_history() -> Vec<Release> {
    vec![
        Release::new("apps/web/releases/R3")
            .with_artifacts(["img:2"])
            .with_env("LOG_LEVEL", "debug"),
        Release::new("apps/web/releases/R2").with_artifacts(["img:2"]),
        Release::new("apps/web/releases/R1"),
    ]
}

fn pair_names(history: &[Release], filters: &FilterSet) -> Vec<(String, Option<String>)> {
    project(history, filters)
        .into_iter()
        .map(|p| (p.release.label().to_string(), p.prev.map(|r| r.label().to_string())))
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario tests
// ---------------------------------------------------------------------------

#[test]
fn classifications_follow_artifact_changes() {
    let history = three_release_history();
    let kinds: Vec<ReleaseKind> = history
        .iter()
        .enumerate()
        .map(|(i, r)| classify(r, history.get(i + 1)))
        .collect();

    assert_eq!(kinds, [ReleaseKind::Env, ReleaseKind::Code, ReleaseKind::Env]);
}

#[test]
fn code_filter_shows_only_code_releases() {
    let history = three_release_history();

    assert_eq!(
        pair_names(&history, &filters(&[FilterTag::Code])),
        [("R2".to_string(), Some("R1".to_string()))]
    );
}

#[test]
fn both_filters_show_everything_in_order() {
    let history = three_release_history();

    assert_eq!(
        pair_names(&history, &filters(&[FilterTag::Code, FilterTag::Env])),
        [
            ("R3".to_string(), Some("R2".to_string())),
            ("R2".to_string(), Some("R1".to_string())),
            ("R1".to_string(), None),
        ]
    );
}

#[test]
fn env_filter_pairs_with_hidden_predecessor() {
    let history = three_release_history();
    let pairs = project(&history, &filters(&[FilterTag::Env]));

    assert_eq!(pairs.len(), 2);
    // R2 is filtered out, yet R3 still diffs against it.
    assert_eq!(pairs[0].prev.map(|r| r.label()), Some("R2"));
    assert_eq!(pairs[1].prev, None);
}

#[test]
fn decoded_default_filter_matches_code_view() {
    let history = three_release_history();

    assert_eq!(
        pair_names(&history, &FilterSet::decode("")),
        pair_names(&history, &filters(&[FilterTag::Code]))
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_history() -> impl Strategy<Value = Vec<Release>> {
    prop::collection::vec(prop::collection::vec("[ab]", 0..3), 0..8).prop_map(|artifacts| {
        artifacts
            .into_iter()
            .enumerate()
            .map(|(i, a)| Release::new(format!("apps/p/releases/{i}")).with_artifacts(a))
            .collect()
    })
}

fn arb_filters() -> impl Strategy<Value = FilterSet> {
    prop::collection::vec(prop::sample::select(FilterTag::ALL.to_vec()), 0..3)
        .prop_map(|tags| tags.into_iter().collect())
}

proptest! {
    #[test]
    fn projection_is_idempotent(history in arb_history(), filters in arb_filters()) {
        prop_assert_eq!(project(&history, &filters), project(&history, &filters));
    }

    #[test]
    fn pairs_always_use_true_predecessor(history in arb_history(), filters in arb_filters()) {
        for pair in project(&history, &filters) {
            prop_assert_eq!(&history[pair.index], pair.release);
            prop_assert_eq!(pair.prev, history.get(pair.index + 1));
        }
    }

    #[test]
    fn both_filters_keep_every_release(history in arb_history()) {
        let all: FilterSet = FilterTag::ALL.into_iter().collect();
        prop_assert_eq!(project(&history, &all).len(), history.len());
    }

    #[test]
    fn code_and_env_views_partition_history(history in arb_history()) {
        let code = project(&history, &filters(&[FilterTag::Code])).len();
        let env = project(&history, &filters(&[FilterTag::Env])).len();
        prop_assert_eq!(code + env, history.len());
    }
}
