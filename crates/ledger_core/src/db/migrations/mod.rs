//! Versioned schema for the `account_transactions` ledger table.
//!
//! Version 1 creates `account_transactions`:
//! - `seq` gives insertion order for every find; `id` is the public UUID.
//! - `transaction_ts` holds nanoseconds since the Unix epoch, or NULL.
//! - `type` is limited to `DEPOSIT`/`WITHDRAW` by a CHECK constraint.
//! - `amount` is decimal text so the scale survives a round trip.
//!
//! Two indexes back the account and account/type/timestamp lookups.
//! Each migration bumps `PRAGMA user_version` to its own number inside the
//! same transaction, so a partially migrated ledger is never observed.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "account_transactions",
    sql: include_str!("0001_account_transactions.sql"),
}];

/// Highest ledger schema version this build can open.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the ledger schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the ledger was written by a newer build.
/// - `Sqlite` when any migration statement fails; nothing is committed then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }
    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=db_migrate_step module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
