//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage shape and details.

pub mod filter;
pub mod mapping;
pub mod transaction_service;
