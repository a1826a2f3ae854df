//! Navigation state as seen by the history view.

use std::fmt;

/// Path and query string of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Query string, either empty or starting with `?`.
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }

    /// Split an href such as `/apps/web?rhf=env` into path and query.
    pub fn parse(href: &str) -> Self {
        match href.find('?') {
            Some(idx) => Self::new(&href[..idx], &href[idx..]),
            None => Self::new(href, ""),
        }
    }

    pub fn href(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pathname, self.search)
    }
}

/// Router boundary: read the current location, replace it in place.
pub trait Navigator {
    fn location(&self) -> &Location;

    /// Replace the current history entry (no new entry is pushed).
    fn replace(&mut self, pathname: &str, search: &str);
}

/// Navigator that only remembers the current location.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    current: Location,
    replacements: usize,
}

impl MemoryNavigator {
    pub fn new(location: Location) -> Self {
        Self {
            current: location,
            replacements: 0,
        }
    }

    /// How many times the location was replaced.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> &Location {
        &self.current
    }

    fn replace(&mut self, pathname: &str, search: &str) {
        self.current = Location::new(pathname, search);
        self.replacements += 1;
    }
}
