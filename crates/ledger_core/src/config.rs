//! Process configuration for ledger callers.
//!
//! Values come from the environment, with `.env` files honored through
//! `dotenv`. Parsing goes through a lookup function so it can be exercised
//! without mutating process state.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "LEDGER_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "LEDGER_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "LEDGER_LOG_DIR";

/// Resolved ledger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// SQLite file; `None` selects an in-memory store.
    pub db_path: Option<PathBuf>,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: String,
    /// Absolute log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl LedgerConfig {
    /// Loads settings from the process environment and `.env`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// - Unsupported log level.
    /// - Relative log directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level)
                .map_err(|err| format!("{LOG_LEVEL_VAR}: {err}"))?
                .to_string(),
            None => default_log_level().to_string(),
        };

        let log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                return Err(format!(
                    "{LOG_DIR_VAR}: must be an absolute path, got `{}`",
                    dir.display()
                ));
            }
        }

        Ok(Self {
            db_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_dir,
        })
    }
}
