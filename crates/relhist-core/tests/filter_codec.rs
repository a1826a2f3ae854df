//! Filter state codec tests: `rhf` decoding, encoding and the toggle rule.

use proptest::prelude::*;
use relhist_core::{
    toggle, toggle_filter, FilterSet, FilterTag, Location, MemoryNavigator, Navigator,
};

fn filters(tags: &[FilterTag]) -> FilterSet {
    tags.iter().copied().collect()
}

#[test]
fn absent_parameter_is_code_only() {
    assert_eq!(FilterSet::decode(""), filters(&[FilterTag::Code]));
    assert_eq!(FilterSet::decode("?"), filters(&[FilterTag::Code]));
}

#[test]
fn toggle_scenario_from_default() {
    let search = toggle("?app=web", FilterTag::Code, false);
    assert_eq!(search, "?app=web&rhf=env");
    assert_eq!(FilterSet::decode(&search), filters(&[FilterTag::Env]));

    let search = toggle(&search, FilterTag::Code, true);
    assert_eq!(search, "?app=web&rhf=code&rhf=env");
    assert_eq!(
        FilterSet::decode(&search),
        filters(&[FilterTag::Code, FilterTag::Env])
    );

    let search = toggle(&search, FilterTag::Env, false);
    assert_eq!(search, "?app=web");
    assert_eq!(FilterSet::persisted(&search), None);
}

#[test]
fn checking_env_on_default_view_keeps_code() {
    assert_eq!(toggle("", FilterTag::Env, true), "?rhf=code&rhf=env");
}

#[test]
fn explicit_code_singleton_is_normalized_away() {
    // A hand-written `rhf=code` is the default view; any rewrite drops it.
    assert_eq!(toggle("?rhf=code", FilterTag::Code, true), "");
}

#[test]
fn unchecking_explicit_code_does_not_force_env() {
    assert_eq!(toggle("?rhf=code&rhf=env", FilterTag::Code, false), "?rhf=env");
}

#[test]
fn unrelated_parameters_survive_every_rewrite() {
    let mut search = "?q=redis%2Bcache&rhf=env&tab=history".to_string();
    for (tag, checked) in [
        (FilterTag::Code, true),
        (FilterTag::Env, false),
        (FilterTag::Code, false),
    ] {
        search = toggle(&search, tag, checked);
        assert!(search.contains("q=redis%2Bcache"), "lost q in {search}");
        assert!(search.contains("tab=history"), "lost tab in {search}");
    }
}

#[test]
fn navigator_receives_rewritten_location() {
    let mut nav = MemoryNavigator::new(Location::parse("/apps/web/deploy"));

    toggle_filter(&mut nav, FilterTag::Code, false);
    assert_eq!(nav.location().href(), "/apps/web/deploy?rhf=env");

    toggle_filter(&mut nav, FilterTag::Env, false);
    assert_eq!(nav.location().href(), "/apps/web/deploy");
    assert_eq!(nav.replacements(), 2);
}

fn arb_filters() -> impl Strategy<Value = FilterSet> {
    prop::collection::vec(prop::sample::select(FilterTag::ALL.to_vec()), 0..4)
        .prop_map(|tags| tags.into_iter().collect())
}

fn arb_other_params() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-q]{1,4}", "[a-z0-9]{0,4}"), 0..3).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    })
}

proptest! {
    #[test]
    fn decode_of_encode_is_normalized_set(set in arb_filters(), others in arb_other_params()) {
        let search = set.clone().normalized().encode_into(&others);
        let expected = {
            let n = set.normalized();
            if n.is_empty() { FilterSet::default_view() } else { n }
        };
        prop_assert_eq!(FilterSet::decode(&search), expected);
    }

    #[test]
    fn encode_keeps_other_pairs_in_order(set in arb_filters(), others in arb_other_params()) {
        let search = set.encode_into(&others);
        let kept: Vec<&str> = search
            .trim_start_matches('?')
            .split('&')
            .filter(|s| !s.is_empty() && !s.starts_with("rhf="))
            .collect();
        let original: Vec<&str> = others.split('&').filter(|s| !s.is_empty()).collect();
        prop_assert_eq!(kept, original);
    }

    #[test]
    fn toggled_view_is_never_empty(
        start in arb_filters(),
        tag in prop::sample::select(FilterTag::ALL.to_vec()),
        checked in any::<bool>(),
    ) {
        let search = start.encode_into("");
        let next = toggle(&search, tag, checked);
        prop_assert!(!FilterSet::decode(&next).is_empty());
    }
}
