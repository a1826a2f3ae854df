//! Release classification and the filter tags that select them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RelhistError;

/// What a release changed relative to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    /// Code artifacts differ from the predecessor.
    Code,
    /// Only environment or metadata changed.
    Env,
}

/// Tag persisted in the `rhf` query parameter.
///
/// Ordering is the canonical serialization order: `code` before `env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTag {
    Code,
    Env,
}

impl FilterTag {
    pub const ALL: [FilterTag; 2] = [FilterTag::Code, FilterTag::Env];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterTag::Code => "code",
            FilterTag::Env => "env",
        }
    }

    /// The classification this tag selects.
    pub fn kind(self) -> ReleaseKind {
        match self {
            FilterTag::Code => ReleaseKind::Code,
            FilterTag::Env => ReleaseKind::Env,
        }
    }

    pub fn matches(self, kind: ReleaseKind) -> bool {
        self.kind() == kind
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterTag {
    type Err = RelhistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(FilterTag::Code),
            "env" => Ok(FilterTag::Env),
            other => Err(RelhistError::UnknownFilterTag(other.to_string())),
        }
    }
}
