//! Balance error types.

use chrono::NaiveDate;
use ohada_shared::AppError;
use thiserror::Error;

/// Errors that can occur while assembling or querying a balance.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Two accounts share the same code.
    #[error("Duplicate account code: {0}")]
    DuplicateCode(String),

    /// An account references a parent that does not exist.
    #[error("Account {code} references unknown parent {parent}")]
    UnknownParent {
        /// Child account code.
        code: String,
        /// Missing parent code.
        parent: String,
    },

    /// An account is unreachable from any root (parent cycle).
    #[error("Account {0} is part of a parent cycle")]
    Cycle(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The balance source failed.
    #[error("Balance source error: {0}")]
    Source(String),
}

impl BalanceError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_)
            | Self::UnknownParent { .. }
            | Self::Cycle(_)
            | Self::InvalidDateRange { .. } => 400,
            Self::Source(_) => 500,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::UnknownParent { .. } => "UNKNOWN_PARENT_ACCOUNT",
            Self::Cycle(_) => "ACCOUNT_CYCLE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Source(_) => "BALANCE_SOURCE_ERROR",
        }
    }
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::Source(msg) => Self::Internal(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parent_error() {
        let err = BalanceError::UnknownParent {
            code: "411100".to_string(),
            parent: "41".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "UNKNOWN_PARENT_ACCOUNT");
        assert!(err.to_string().contains("411100"));
    }

    #[test]
    fn test_source_error_maps_to_internal() {
        let app: AppError = BalanceError::Source("offline".to_string()).into();
        assert_eq!(app.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_cycle_maps_to_validation() {
        let app: AppError = BalanceError::Cycle("6".to_string()).into();
        assert_eq!(app.status_code(), 400);
    }
}
