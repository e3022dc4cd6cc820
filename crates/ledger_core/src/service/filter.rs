//! Optional-filter selection for account transaction queries.
//!
//! # Invariants
//! - Type presence gates whether date bounds are considered at all.
//! - Date bounds apply only when both `start` and `end` are present; a lone
//!   bound is ignored.

use crate::model::transaction::TransactionType;
use chrono::{DateTime, Utc};

/// Optional filters accepted by `TransactionService::find_all_with_optional_filters`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Store query selected for a filter combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlan {
    /// Account number only.
    Account,
    /// Account number and type.
    AccountAndType(TransactionType),
    /// Account number, type and inclusive timestamp range.
    AccountTypeAndRange {
        kind: TransactionType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TransactionFilter {
    /// Filter with only a type.
    pub fn by_type(kind: TransactionType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets both range bounds.
    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Picks the store query serving this filter combination.
    pub fn plan(&self) -> QueryPlan {
        match (self.kind, self.start, self.end) {
            (Some(kind), Some(start), Some(end)) => {
                QueryPlan::AccountTypeAndRange { kind, start, end }
            }
            (Some(kind), _, _) => QueryPlan::AccountAndType(kind),
            (None, _, _) => QueryPlan::Account,
        }
    }
}

impl QueryPlan {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::AccountAndType(_) => "account_type",
            Self::AccountTypeAndRange { .. } => "account_type_range",
        }
    }
}
