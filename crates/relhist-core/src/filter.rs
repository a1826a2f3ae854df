//! Filter state codec for the `rhf` query parameter.
//!
//! The set of visible release kinds lives in the page URL so it survives
//! reloads and can be shared. Absence of the parameter is the canonical
//! spelling of the default view (`code` only); toggles go through the pure
//! [`reduce`] function and are written back with [`FilterSet::encode_into`],
//! which leaves every other query parameter untouched.

use std::collections::BTreeSet;

use url::form_urlencoded;

use crate::domain::FilterTag;
use crate::location::Navigator;
use crate::obs::emit_filter_toggled;

/// Query parameter holding the active filter tags.
pub const FILTER_PARAM: &str = "rhf";

/// Set of active filter tags, iterated in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSet(BTreeSet<FilterTag>);

impl FilterSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The view shown when `rhf` is absent: code releases only.
    pub fn default_view() -> Self {
        [FilterTag::Code].into_iter().collect()
    }

    pub fn contains(&self, tag: FilterTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn insert(&mut self, tag: FilterTag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: FilterTag) -> bool {
        self.0.remove(&tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FilterTag> + '_ {
        self.0.iter().copied()
    }

    /// `{code}` is spelled as "no parameter"; every other set is kept.
    pub fn normalized(mut self) -> Self {
        if self.0.len() == 1 && self.contains(FilterTag::Code) {
            self.0.clear();
        }
        self
    }

    /// The explicitly persisted set, `None` when `rhf` is absent.
    ///
    /// Unknown tag values are ignored, so a present parameter can still
    /// yield an empty set.
    pub fn persisted(search: &str) -> Option<FilterSet> {
        let mut present = false;
        let mut set = FilterSet::empty();
        for (key, value) in form_urlencoded::parse(strip_question_mark(search).as_bytes()) {
            if key != FILTER_PARAM {
                continue;
            }
            present = true;
            if let Ok(tag) = value.parse::<FilterTag>() {
                set.insert(tag);
            }
        }
        present.then_some(set)
    }

    /// The effective set for rendering: the persisted set, or the default
    /// view when nothing usable is persisted.
    pub fn decode(search: &str) -> FilterSet {
        Self::persisted(search)
            .filter(|set| !set.is_empty())
            .unwrap_or_else(Self::default_view)
    }

    /// Rewrite `search` so that `rhf` carries exactly this set.
    ///
    /// Other parameters keep their raw encoding and their position. The
    /// `rhf` pairs take the place of the first existing `rhf` pair, or go
    /// last. An empty set removes the parameter. Returns `""` or a string
    /// starting with `?`.
    pub fn encode_into(&self, search: &str) -> String {
        let mut segments: Vec<String> = Vec::new();
        let mut placed = false;
        for segment in strip_question_mark(search).split('&') {
            if segment.is_empty() {
                continue;
            }
            if segment_key(segment).as_deref() == Some(FILTER_PARAM) {
                if !placed {
                    segments.extend(self.encoded_pairs());
                    placed = true;
                }
                continue;
            }
            segments.push(segment.to_string());
        }
        if !placed {
            segments.extend(self.encoded_pairs());
        }

        if segments.is_empty() {
            String::new()
        } else {
            format!("?{}", segments.join("&"))
        }
    }

    fn encoded_pairs(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|tag| {
            form_urlencoded::Serializer::new(String::new())
                .append_pair(FILTER_PARAM, tag.as_str())
                .finish()
        })
    }
}

impl FromIterator<FilterTag> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterTag>>(iter: I) -> Self {
        FilterSet(iter.into_iter().collect())
    }
}

fn strip_question_mark(search: &str) -> &str {
    search.strip_prefix('?').unwrap_or(search)
}

fn segment_key(segment: &str) -> Option<String> {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}

// ---------------------------------------------------------------------------
// Toggle reducer
// ---------------------------------------------------------------------------

/// User interaction on one of the filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Toggle { tag: FilterTag, checked: bool },
}

/// Compute the set to persist after `action`.
///
/// The working set starts from the persisted set (or the default view).
/// Unchecking `code` while it is only implied by the default turns `env`
/// on, so the list never goes blank. The result is normalized.
pub fn reduce(persisted: Option<&FilterSet>, action: FilterAction) -> FilterSet {
    let mut working = persisted
        .filter(|set| !set.is_empty())
        .cloned()
        .unwrap_or_else(FilterSet::default_view);

    match action {
        FilterAction::Toggle { tag, checked: true } => {
            working.insert(tag);
        }
        FilterAction::Toggle {
            tag,
            checked: false,
        } => {
            working.remove(tag);
            let code_explicit = persisted.is_some_and(|set| set.contains(FilterTag::Code));
            if tag == FilterTag::Code && !code_explicit {
                working.insert(FilterTag::Env);
            }
        }
    }

    working.normalized()
}

/// Apply a checkbox toggle to a query string, returning the new one.
pub fn toggle(search: &str, tag: FilterTag, checked: bool) -> String {
    let persisted = FilterSet::persisted(search);
    let next = reduce(persisted.as_ref(), FilterAction::Toggle { tag, checked });
    next.encode_into(search)
}

/// Checkbox change handler: rewrites the current location in place.
pub fn toggle_filter(navigator: &mut dyn Navigator, tag: FilterTag, checked: bool) {
    let location = navigator.location().clone();
    let search = toggle(&location.search, tag, checked);
    emit_filter_toggled(tag.as_str(), checked, &search);
    navigator.replace(&location.pathname, &search);
}
