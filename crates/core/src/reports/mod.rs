//! Financial report generation.
//!
//! This module provides pure business logic for generating:
//! - Trial Balance (balance générale) with class subtotals
//! - General Ledger (grand livre) with running balances

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
