//! Domain model for account transaction events.
//!
//! # Responsibility
//! - Define the persisted record shape and its transfer counterpart.
//! - Keep the two shapes structurally identical but separately typed.
//!
//! # Invariants
//! - Every persisted record carries a store-assigned `TransactionId`.
//! - Records form an append-only ledger.

pub mod dto;
pub mod transaction;
