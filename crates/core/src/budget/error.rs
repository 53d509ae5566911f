//! Budget error types.

use ohada_shared::AppError;
use ohada_shared::types::{BudgetId, BudgetLineId};
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget line not found.
    #[error("Budget line not found: {0}")]
    LineNotFound(BudgetLineId),

    /// Budget is locked and cannot be modified.
    #[error("Budget is locked and cannot be modified")]
    BudgetLocked,

    /// Budget name is blank.
    #[error("Budget name is required")]
    EmptyName,

    /// Budget name already exists for this fiscal year.
    #[error("Budget name already exists for fiscal year {0}")]
    DuplicateName(i32),

    /// Period outside `1..=12`.
    #[error("Invalid budget period {0}, expected 1 to 12")]
    InvalidPeriod(u8),

    /// Account code does not start with a SYSCOHADA class digit.
    #[error("Invalid account code: {0}")]
    InvalidAccountCode(String),

    /// Budget line already exists for this account and period.
    #[error("Budget line already exists for account {account} in period {period}")]
    DuplicateBudgetLine {
        /// Account code.
        account: String,
        /// Month.
        period: u8,
    },

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,
}

impl BudgetError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::LineNotFound(_) => 404,
            Self::EmptyName
            | Self::InvalidPeriod(_)
            | Self::InvalidAccountCode(_)
            | Self::NegativeAmount => 400,
            Self::DuplicateName(_) | Self::DuplicateBudgetLine { .. } => 409,
            Self::BudgetLocked => 422,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::LineNotFound(_) => "BUDGET_LINE_NOT_FOUND",
            Self::BudgetLocked => "BUDGET_LOCKED",
            Self::EmptyName => "BUDGET_NAME_REQUIRED",
            Self::DuplicateName(_) => "DUPLICATE_BUDGET_NAME",
            Self::InvalidPeriod(_) => "INVALID_BUDGET_PERIOD",
            Self::InvalidAccountCode(_) => "INVALID_ACCOUNT_CODE",
            Self::DuplicateBudgetLine { .. } => "DUPLICATE_BUDGET_LINE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        let msg = err.to_string();
        match err.status_code() {
            404 => Self::NotFound(msg),
            409 => Self::Conflict(msg),
            422 => Self::BusinessRule(msg),
            _ => Self::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_budget_is_business_rule() {
        let err: AppError = BudgetError::BudgetLocked.into();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_duplicate_line_is_conflict() {
        let err = BudgetError::DuplicateBudgetLine {
            account: "601100".to_string(),
            period: 3,
        };
        assert_eq!(
            err.to_string(),
            "Budget line already exists for account 601100 in period 3"
        );
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }

    #[test]
    fn test_not_found_mapping() {
        let err: AppError = BudgetError::NotFound(BudgetId::new()).into();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
