//! Account transaction repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist one record per save, assigning its stable id.
//! - Provide the three account-scoped lookups used by the service layer.
//!
//! # Invariants
//! - Write path calls `AccountTransaction::validate()` before inserting.
//! - Finds return rows in insertion order.
//! - Timestamps keep full nanosecond precision; range bounds are inclusive
//!   on both ends and rows without a timestamp never match a range.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::transaction::{
    AccountTransaction, TransactionType, TransactionValidationError,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Params, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const TRANSACTION_SELECT_SQL: &str = "SELECT
    id,
    account_number,
    transaction_ts,
    type,
    amount
FROM account_transactions";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for transaction persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TransactionValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted transaction data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TransactionValidationError> for RepoError {
    fn from(value: TransactionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store adapter for account transactions.
pub trait AccountTransactionRepository {
    /// Inserts a new record and returns it with its assigned id.
    fn save(&self, record: &AccountTransaction) -> RepoResult<AccountTransaction>;

    /// All records of one account.
    fn find_by_account(&self, account_number: &str) -> RepoResult<Vec<AccountTransaction>>;

    /// Records of one account with the given type.
    fn find_by_account_and_type(
        &self,
        account_number: &str,
        kind: TransactionType,
    ) -> RepoResult<Vec<AccountTransaction>>;

    /// Records of one account with the given type and
    /// `start <= transaction_ts <= end`, compared at nanosecond precision.
    fn find_by_account_and_type_and_timestamp_between(
        &self,
        account_number: &str,
        kind: TransactionType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<AccountTransaction>>;
}

/// SQLite-backed transaction repository.
pub struct SqliteAccountTransactionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountTransactionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_records<P: Params>(
        &self,
        filter_sql: &str,
        params: P,
    ) -> RepoResult<Vec<AccountTransaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRANSACTION_SELECT_SQL}
             WHERE {filter_sql}
             ORDER BY seq ASC;"
        ))?;

        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_transaction_row(row)?);
        }

        Ok(records)
    }
}

impl AccountTransactionRepository for SqliteAccountTransactionRepository<'_> {
    fn save(&self, record: &AccountTransaction) -> RepoResult<AccountTransaction> {
        if let Some(id) = record.id {
            return Err(TransactionValidationError::IdAlreadyAssigned(id).into());
        }
        record.validate()?;

        let persisted = AccountTransaction {
            id: Some(Uuid::new_v4()),
            ..record.clone()
        };
        let stored_ts = persisted
            .transaction_ts
            .map(|ts| {
                ts.timestamp_nanos_opt()
                    .ok_or(TransactionValidationError::TimestampOutOfRange(ts))
            })
            .transpose()?;

        self.conn.execute(
            "INSERT INTO account_transactions (
                id,
                account_number,
                transaction_ts,
                type,
                amount
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                persisted.id.map(|id| id.to_string()),
                persisted.account_number.as_str(),
                stored_ts,
                persisted.kind.as_str(),
                persisted.amount.to_string(),
            ],
        )?;

        Ok(persisted)
    }

    fn find_by_account(&self, account_number: &str) -> RepoResult<Vec<AccountTransaction>> {
        self.query_records("account_number = ?1", params![account_number])
    }

    fn find_by_account_and_type(
        &self,
        account_number: &str,
        kind: TransactionType,
    ) -> RepoResult<Vec<AccountTransaction>> {
        self.query_records(
            "account_number = ?1 AND type = ?2",
            params![account_number, kind.as_str()],
        )
    }

    fn find_by_account_and_type_and_timestamp_between(
        &self,
        account_number: &str,
        kind: TransactionType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<AccountTransaction>> {
        self.query_records(
            "account_number = ?1
               AND type = ?2
               AND transaction_ts IS NOT NULL
               AND transaction_ts BETWEEN ?3 AND ?4",
            params![
                account_number,
                kind.as_str(),
                bound_nanos(start),
                bound_nanos(end)
            ],
        )
    }
}

fn parse_transaction_row(row: &Row<'_>) -> RepoResult<AccountTransaction> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid id value `{id_text}` in account_transactions.id"
        ))
    })?;

    let transaction_ts = row
        .get::<_, Option<i64>>("transaction_ts")?
        .map(DateTime::<Utc>::from_timestamp_nanos);

    let type_text: String = row.get("type")?;
    let kind = TransactionType::from_str(&type_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid transaction type `{type_text}` in account_transactions.type"
        ))
    })?;

    let amount_text: String = row.get("amount")?;
    let amount = Decimal::from_str(&amount_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid decimal `{amount_text}` in account_transactions.amount"
        ))
    })?;

    Ok(AccountTransaction {
        id: Some(id),
        account_number: row.get("account_number")?,
        transaction_ts,
        kind,
        amount,
    })
}

/// Range bounds outside the storable span clamp to its ends, so a bound
/// before 1677 still matches every stored timestamp after it.
fn bound_nanos(bound: DateTime<Utc>) -> i64 {
    bound.timestamp_nanos_opt().unwrap_or(if bound < DateTime::UNIX_EPOCH {
        i64::MIN
    } else {
        i64::MAX
    })
}
