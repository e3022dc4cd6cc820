//! Account transaction use-case service.
//!
//! # Responsibility
//! - Expose one query surface over every optional-filter combination.
//! - Convert between persisted and transfer shapes at the boundary.
//! - Classify repository failures into domain errors.
//!
//! # Invariants
//! - Every operation propagates store failures; an empty result always
//!   means "no matching data".
//! - Service layer remains storage-agnostic.

use crate::model::dto::AccountTransactionDto;
use crate::model::transaction::{AccountTransaction, TransactionType, TransactionValidationError};
use crate::repo::transaction_repo::{AccountTransactionRepository, RepoError, RepoResult};
use crate::service::filter::{QueryPlan, TransactionFilter};
use crate::service::mapping::to_dtos;
use chrono::{DateTime, Utc};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TransactionServiceError>;

/// Service error for account transaction use-cases.
#[derive(Debug)]
pub enum TransactionServiceError {
    /// Input rejected before reaching the store.
    Validation(TransactionValidationError),
    /// Store could not complete the read or write.
    StoreAccess {
        operation: &'static str,
        account_number: String,
        source: RepoError,
    },
}

impl Display for TransactionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid transaction: {err}"),
            Self::StoreAccess {
                operation,
                account_number,
                source,
            } => write!(
                f,
                "store access failed during {operation} for account `{account_number}`: {source}"
            ),
        }
    }
}

impl Error for TransactionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreAccess { source, .. } => Some(source),
        }
    }
}

/// Transaction service facade over repository implementations.
pub struct TransactionService<R: AccountTransactionRepository> {
    repo: R,
}

impl<R: AccountTransactionRepository> TransactionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists one transaction and returns it with its assigned id.
    ///
    /// # Errors
    /// - `Validation` for blank account numbers, negative amounts or a
    ///   record that already has an id.
    /// - `StoreAccess` when the insert fails.
    pub fn add_transaction(
        &self,
        dto: AccountTransactionDto,
    ) -> ServiceResult<AccountTransactionDto> {
        const OP: &str = "add_transaction";
        debug!("event=tx_add module=service status=start");

        let account_number = dto.account_number.clone();
        let record = AccountTransaction::from(dto);
        let saved = self
            .repo
            .save(&record)
            .map_err(|err| classify(OP, &account_number, err))?;

        debug!(
            "event=tx_add module=service status=ok id={}",
            saved.id.map(|id| id.to_string()).unwrap_or_default()
        );
        Ok(saved.into())
    }

    /// Lists every transaction of one account.
    pub fn find_all_for_account(
        &self,
        account_number: &str,
    ) -> ServiceResult<Vec<AccountTransactionDto>> {
        self.run_query("find_all_for_account", account_number, || {
            self.repo.find_by_account(account_number)
        })
    }

    /// Lists transactions of one account with the given type.
    pub fn find_all_for_account_and_type(
        &self,
        account_number: &str,
        kind: TransactionType,
    ) -> ServiceResult<Vec<AccountTransactionDto>> {
        self.run_query("find_all_for_account_and_type", account_number, || {
            self.repo.find_by_account_and_type(account_number, kind)
        })
    }

    /// Lists transactions of one account with the given type inside the
    /// inclusive `[start, end]` timestamp range.
    pub fn find_all_for_account_with_type_and_range(
        &self,
        account_number: &str,
        kind: TransactionType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ServiceResult<Vec<AccountTransactionDto>> {
        self.run_query(
            "find_all_for_account_with_type_and_range",
            account_number,
            || {
                self.repo
                    .find_by_account_and_type_and_timestamp_between(account_number, kind, start, end)
            },
        )
    }

    /// Lists transactions of one account, narrowing by whichever optional
    /// filters apply according to `TransactionFilter::plan`.
    pub fn find_all_with_optional_filters(
        &self,
        account_number: &str,
        filter: &TransactionFilter,
    ) -> ServiceResult<Vec<AccountTransactionDto>> {
        let plan = filter.plan();
        debug!(
            "event=tx_filter_plan module=service status=ok plan={}",
            plan.name()
        );

        self.run_query("find_all_with_optional_filters", account_number, || match plan {
            QueryPlan::Account => self.repo.find_by_account(account_number),
            QueryPlan::AccountAndType(kind) => {
                self.repo.find_by_account_and_type(account_number, kind)
            }
            QueryPlan::AccountTypeAndRange { kind, start, end } => self
                .repo
                .find_by_account_and_type_and_timestamp_between(account_number, kind, start, end),
        })
    }

    fn run_query(
        &self,
        operation: &'static str,
        account_number: &str,
        query: impl FnOnce() -> RepoResult<Vec<AccountTransaction>>,
    ) -> ServiceResult<Vec<AccountTransactionDto>> {
        debug!("event=tx_query module=service status=start op={operation}");

        let records = query().map_err(|err| classify(operation, account_number, err))?;

        debug!(
            "event=tx_query module=service status=ok op={} count={}",
            operation,
            records.len()
        );
        Ok(to_dtos(records))
    }
}

fn classify(
    operation: &'static str,
    account_number: &str,
    err: RepoError,
) -> TransactionServiceError {
    match err {
        RepoError::Validation(inner) => {
            error!(
                "event=tx_op module=service status=error op={} error_code=validation_failed account={} error={}",
                operation, account_number, inner
            );
            TransactionServiceError::Validation(inner)
        }
        other => {
            error!(
                "event=tx_op module=service status=error op={} error_code=store_access_failed account={} error={}",
                operation, account_number, other
            );
            TransactionServiceError::StoreAccess {
                operation,
                account_number: account_number.to_string(),
                source: other,
            }
        }
    }
}
