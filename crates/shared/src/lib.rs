//! Shared types, errors, and configuration for the OHADA ledger workspace.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision (CFA francs first)
//! - Typed IDs for type-safe entity references
//! - Pagination types for list operations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CacheSettings, ClosurePolicy, ClosureSettings, LedgerSettings};
pub use error::{AppError, AppResult};
