//! Relhist Core Library
//!
//! Release classification, `rhf` filter state, history projection, live
//! reconciliation and redeploy selection for the release history view.
//!
//! Data flows one way: fetched releases go through [`LiveReleaseHistory`]
//! (freshness), then [`project`] (classify, filter, pair) into a
//! [`HistoryView`]. User input flows back through [`toggle_filter`] (URL)
//! and [`SelectionController`] (selection, then persist).

pub mod classify;
pub mod config;
pub mod domain;
pub mod env_diff;
pub mod filter;
pub mod live;
pub mod location;
pub mod metrics;
pub mod obs;
pub mod projector;
pub mod selection;
pub mod telemetry;
pub mod view;

pub use classify::{classify, is_code_release, is_env_release};
pub use config::HistoryConfig;
pub use domain::{FilterTag, RelhistError, ReleaseKind, Result};
pub use env_diff::{diff_env, render_env_diff, EnvChange, EnvDiff};
pub use filter::{reduce, toggle, toggle_filter, FilterAction, FilterSet, FILTER_PARAM};
pub use live::{LiveReleaseHistory, LiveState};
pub use location::{Location, MemoryNavigator, Navigator};
pub use projector::{project, ReleasePair};
pub use selection::{SelectionController, SubmitOutcome};
pub use view::{FilterToggles, HistoryView, ReleaseRow, SubmitButton};

pub use relhist_state::{Release, ReleaseSource, ReleaseWatcher, StorageError, Subscription};

pub use metrics::METRICS;
pub use obs::AppSpan;
pub use telemetry::init_tracing;

/// Relhist version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
