//! Persistence-access core for the account transaction ledger.
//! Owns the record store adapter, the transaction service and their shapes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::LedgerConfig;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::dto::AccountTransactionDto;
pub use model::transaction::{
    AccountTransaction, TransactionId, TransactionType, TransactionValidationError,
};
pub use repo::transaction_repo::{
    AccountTransactionRepository, RepoError, RepoResult, SqliteAccountTransactionRepository,
};
pub use service::filter::{QueryPlan, TransactionFilter};
pub use service::transaction_service::{
    ServiceResult, TransactionService, TransactionServiceError,
};

/// Minimal health-check API for callers probing linkage.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
