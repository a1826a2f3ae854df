//! Domain models for relhist.
//!
//! Canonical definitions shared by the engine:
//! - `ReleaseKind`: code vs environment release
//! - `FilterTag`: the `rhf` tags selecting release kinds
//! - `RelhistError`: domain error taxonomy

pub mod error;
pub mod kind;

pub use error::{RelhistError, Result};
pub use kind::{FilterTag, ReleaseKind};
