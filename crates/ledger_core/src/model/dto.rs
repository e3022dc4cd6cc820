//! Transfer representation exchanged with callers of the service layer.
//!
//! Field set mirrors `AccountTransaction`; only the serialized names differ
//! (`camelCase`, `type` for the kind). Conversions live in
//! `service::mapping`.

use crate::model::transaction::{TransactionId, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Service-boundary shape of one account transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransactionDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,
    pub account_number: String,
    #[serde(default)]
    pub transaction_ts: Option<DateTime<Utc>>,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Serialized as decimal text to keep precision across transports.
    pub amount: Decimal,
}

impl AccountTransactionDto {
    /// Creates an unsaved transfer record.
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
}
