//! Environment-driven configuration.

use std::path::PathBuf;

use crate::domain::{RelhistError, Result};

pub const APP_ENV: &str = "RELHIST_APP";
pub const RELEASES_FILE_ENV: &str = "RELHIST_RELEASES_FILE";
pub const LOG_FORMAT_ENV: &str = "RELHIST_LOG_FORMAT";

pub const DEFAULT_RELEASES_FILE: &str = "releases.json";

/// Settings for the release history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Application whose releases are listed
    pub app_name: Option<String>,
    /// JSON document holding release histories
    pub releases_file: PathBuf,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            releases_file: PathBuf::from(DEFAULT_RELEASES_FILE),
            json_logs: false,
        }
    }
}

impl HistoryConfig {
    /// Create configuration from environment variables
    ///
    /// Optional: RELHIST_APP, RELHIST_RELEASES_FILE (default: "releases.json"),
    /// RELHIST_LOG_FORMAT ("json" or "text", default: "text")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HistoryConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let app_name = lookup(APP_ENV).filter(|s| !s.trim().is_empty());
        let releases_file = lookup(RELEASES_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.releases_file);
        let json_logs = match lookup(LOG_FORMAT_ENV).as_deref().map(str::to_lowercase) {
            None => defaults.json_logs,
            Some(format) if format == "json" => true,
            Some(format) if format == "text" => false,
            Some(other) => {
                return Err(RelhistError::Config(format!(
                    "{LOG_FORMAT_ENV} must be 'json' or 'text', got '{other}'"
                )))
            }
        };

        Ok(Self {
            app_name,
            releases_file,
            json_logs,
        })
    }
}
