//! Ledger store: one SQLite database holding the `account_transactions`
//! table.
//!
//! `open_store` picks a file when `LEDGER_DB_PATH` is configured and an
//! in-memory database otherwise. Every open path sets a busy timeout and
//! runs `migrations::apply_migrations` before returning, so repositories
//! can assume the ledger table and its indexes exist. A ledger file stamped
//! with a newer `user_version` than this build knows is refused rather than
//! read with a stale schema.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_store};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the ledger store.
#[derive(Debug)]
pub enum DbError {
    /// Underlying SQLite error, including failed migration statements.
    Sqlite(rusqlite::Error),
    /// Ledger file was migrated by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "ledger schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
