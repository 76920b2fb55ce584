//! Organizer configuration.

use crate::error::{OrganizerError, OrganizerResult};
use organizer_storage::{DATABASE_FILE_NAME, SEEDED_DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_CONTAINER_DIR: &str = "ORGANIZER_CONTAINER_DIR";
pub const ENV_DB_FILE: &str = "ORGANIZER_DB_FILE";
pub const ENV_LOG: &str = "ORGANIZER_LOG";
pub const ENV_DEFAULT_CURRENCY: &str = "ORGANIZER_DEFAULT_CURRENCY";
pub const ENV_UTC_OFFSET_SECS: &str = "ORGANIZER_UTC_OFFSET_SECS";

/// Largest accepted UTC offset, in seconds.
const MAX_UTC_OFFSET_SECS: i32 = 86_399;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Shared container directory holding the database. `None` keeps
    /// everything in memory.
    pub container_dir: Option<PathBuf>,

    /// Database file name inside the container.
    pub database_file: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Currency written on first launch when the user has not chosen one.
    pub default_currency: String,

    /// Offset, in seconds east of UTC, that activity days are counted in.
    pub utc_offset_seconds: i32,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            container_dir: None,
            database_file: DATABASE_FILE_NAME.to_string(),
            log_filter: "info".to_string(),
            default_currency: SEEDED_DEFAULT_CURRENCY.to_string(),
            utc_offset_seconds: 0,
        }
    }
}

impl OrganizerConfig {
    /// Defaults overridden by `ORGANIZER_*` environment variables.
    pub fn from_env() -> OrganizerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OrganizerResult<Self> {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_CONTAINER_DIR).filter(|v| !v.trim().is_empty()) {
            config.container_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = lookup(ENV_DB_FILE) {
            config.database_file = file;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(code) = lookup(ENV_DEFAULT_CURRENCY) {
            config.default_currency = code.trim().to_uppercase();
        }
        if let Some(raw) = lookup(ENV_UTC_OFFSET_SECS) {
            config.utc_offset_seconds = raw.trim().parse().map_err(|_| {
                OrganizerError::Config(format!("{ENV_UTC_OFFSET_SECS} is not an integer: {raw}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OrganizerResult<()> {
        if self.database_file.trim().is_empty() {
            return Err(OrganizerError::Config("database file name is empty".into()));
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(OrganizerError::Config(format!(
                "default currency must be a three-letter code, got {:?}",
                self.default_currency
            )));
        }
        if self.utc_offset_seconds.abs() > MAX_UTC_OFFSET_SECS {
            return Err(OrganizerError::Config(format!(
                "UTC offset out of range: {}",
                self.utc_offset_seconds
            )));
        }
        Ok(())
    }
}
