//! Explicit conversions between persisted and transfer shapes.
//!
//! # Invariants
//! - Every field is copied one-to-one; no defaults are invented.
//! - Absent input yields absent output in both directions.
//! - Sequence conversion preserves order and count.

use crate::model::dto::AccountTransactionDto;
use crate::model::transaction::AccountTransaction;

impl From<AccountTransaction> for AccountTransactionDto {
    fn from(value: AccountTransaction) -> Self {
        Self {
            id: value.id,
            account_number: value.account_number,
            transaction_ts: value.transaction_ts,
            kind: value.kind,
            amount: value.amount,
        }
    }
}

impl From<AccountTransactionDto> for AccountTransaction {
    fn from(value: AccountTransactionDto) -> Self {
        Self {
            id: value.id,
            account_number: value.account_number,
            transaction_ts: value.transaction_ts,
            kind: value.kind,
            amount: value.amount,
        }
    }
}

/// Converts an optional persisted record to its transfer shape.
pub fn to_dto(record: Option<AccountTransaction>) -> Option<AccountTransactionDto> {
    record.map(AccountTransactionDto::from)
}

/// Converts an optional transfer record to its persisted shape.
pub fn to_entity(dto: Option<AccountTransactionDto>) -> Option<AccountTransaction> {
    dto.map(AccountTransaction::from)
}

/// Converts persisted records element by element.
pub fn to_dtos(records: Vec<AccountTransaction>) -> Vec<AccountTransactionDto> {
    records.into_iter().map(AccountTransactionDto::from).collect()
}
