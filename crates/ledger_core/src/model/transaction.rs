//! Account transaction domain model.
//!
//! # Responsibility
//! - Define the persisted record for deposit/withdraw events.
//! - Provide write-path validation shared by repository and service.
//!
//! # Invariants
//! - `id` is `None` before first save and never changes afterwards.
//! - `account_number`, `kind` and `amount` are always present.
//! - Records are append-only: this crate never updates or deletes them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque store-assigned identifier of a transaction record.
pub type TransactionId = Uuid;

/// Direction of money movement for one transaction.
///
/// Serde goes through `FromStr`/`as_str`, so JSON input accepts the same
/// spellings as the CLI and the stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TransactionType {
    /// Money put into the account.
    Deposit,
    /// Money taken out of the account.
    Withdraw,
}

impl TransactionType {
    /// Canonical upper-case text form, as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            _ => Err(TransactionValidationError::UnknownType(value.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = TransactionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionType> for &'static str {
    fn from(kind: TransactionType) -> Self {
        kind.as_str()
    }
}

/// Validation failures for transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    /// Account number is empty or whitespace only.
    BlankAccountNumber,
    /// Amount is below zero; direction is carried by the type instead.
    NegativeAmount(Decimal),
    /// Type text is neither `DEPOSIT` nor `WITHDRAW`.
    UnknownType(String),
    /// Record already carries a store-assigned id and cannot be saved again.
    IdAlreadyAssigned(TransactionId),
    /// Timestamp cannot be stored as signed 64-bit nanoseconds since the
    /// Unix epoch (roughly years 1677 to 2262).
    TimestampOutOfRange(DateTime<Utc>),
}

impl Display for TransactionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankAccountNumber => write!(f, "account number cannot be blank"),
            Self::NegativeAmount(amount) => {
                write!(f, "transaction amount cannot be negative, got {amount}")
            }
            Self::UnknownType(value) => write!(
                f,
                "unknown transaction type `{value}`; expected DEPOSIT|WITHDRAW"
            ),
            Self::IdAlreadyAssigned(id) => {
                write!(f, "transaction {id} is already persisted; records are append-only")
            }
            Self::TimestampOutOfRange(ts) => {
                write!(f, "transaction timestamp {ts} is outside the storable range")
            }
        }
    }
}

impl Error for TransactionValidationError {}

/// Persisted shape of one deposit/withdraw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTransaction {
    /// Assigned by the store on save.
    pub id: Option<TransactionId>,
    /// Owning account; format is not checked here.
    pub account_number: String,
    /// When the transaction happened. Stored with nanosecond precision.
    pub transaction_ts: Option<DateTime<Utc>>,
    pub kind: TransactionType,
    /// Exact decimal amount, never a float.
    pub amount: Decimal,
}

impl AccountTransaction {
    /// Creates an unsaved record (no `id` yet).
    pub fn new(
        account_number: impl Into<String>,
        transaction_ts: Option<DateTime<Utc>>,
        kind: TransactionType,
        amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            account_number: account_number.into(),
            transaction_ts,
            kind,
            amount,
        }
    }

    /// Checks write-path invariants.
    ///
    /// # Errors
    /// - `BlankAccountNumber` when `account_number` trims to empty.
    /// - `NegativeAmount` when `amount < 0`.
    /// - `TimestampOutOfRange` when `transaction_ts` has no `i64` nanosecond form.
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.account_number.trim().is_empty() {
            return Err(TransactionValidationError::BlankAccountNumber);
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }
        if let Some(ts) = self.transaction_ts {
            if ts.timestamp_nanos_opt().is_none() {
                return Err(TransactionValidationError::TimestampOutOfRange(ts));
            }
        }
        Ok(())
    }

    /// Returns whether this record has been through `save`.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
