//! Repository layer: the record store adapter.
//!
//! # Responsibility
//! - Define the account-scoped lookups the service layer relies on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `AccountTransaction::validate()`.
//! - Store failures surface as `RepoError`, never as empty results.

pub mod transaction_repo;
