//! Relhist-State: release backend boundary for relhist
//!
//! This crate owns everything the release history view consumes from the
//! outside world: the immutable `Release` record, the one-shot listing
//! interface and the live, name-keyed watch.
//!
//! ## Layer 0 - Data/Backend
//!
//! Focus: snapshot delivery order and scoped subscription lifetime.
//!
//! ## Key Components
//!
//! - `Release`: immutable deployable version (artifacts, labels, env)
//! - `ReleaseSource` / `ReleaseWatcher`: backend traits
//! - `Subscription`: RAII handle, unregisters on drop
//! - `JsonFileReleaseSource`: file-backed source used by the CLI

mod error;
pub mod fakes;
mod json_source;
pub mod storage_traits;

pub use error::StorageError;
pub use json_source::JsonFileReleaseSource;
pub use storage_traits::{
    Release, ReleaseSource, ReleaseWatcher, StorageResult, Subscription, GIT_COMMIT_LABEL,
};
