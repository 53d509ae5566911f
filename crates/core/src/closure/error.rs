//! Closure workflow error types.

use ohada_shared::AppError;
use ohada_shared::types::{ClosurePeriodId, ClosureStepId};
use thiserror::Error;

use crate::closure::types::StepStatus;

/// Errors that can occur during closure operations.
#[derive(Debug, Error)]
pub enum ClosureError {
    /// Closure period not found.
    #[error("Closure period {0} not found")]
    PeriodNotFound(ClosurePeriodId),

    /// Step not found in the period.
    #[error("Step {0} not found in closure period")]
    StepNotFound(ClosureStepId),

    /// The period was already validated.
    #[error("Closure period {0} is closed")]
    PeriodClosed(ClosurePeriodId),

    /// Attempted an invalid status transition.
    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: StepStatus,
        /// The attempted target status.
        to: StepStatus,
    },

    /// The step left `InProgress` while its execution was running.
    #[error("Step {step} changed to {status} during execution")]
    StepChanged {
        /// The executed step.
        step: ClosureStepId,
        /// Status found when the execution finished.
        status: StepStatus,
    },

    /// Two steps of a checklist share an id.
    #[error("Duplicate step {0} in checklist")]
    DuplicateStep(ClosureStepId),

    /// Dependencies of the step are not completed (strict policy).
    #[error("Step {step} has {} unmet dependencies", .pending.len())]
    UnmetDependencies {
        /// The step being started.
        step: ClosureStepId,
        /// Dependencies not yet completed.
        pending: Vec<ClosureStepId>,
    },

    /// Mandatory steps remain (strict policy).
    #[error("{0} mandatory steps are not completed")]
    MandatoryStepsIncomplete(usize),

    /// Required approvals are missing (strict policy).
    #[error("Missing approvals: {}", .0.join(", "))]
    MissingApprovals(Vec<String>),

    /// Approver name is empty.
    #[error("Approver name is required")]
    ApproverRequired,

    /// Period dates are inverted.
    #[error("Closure period must end after it starts")]
    InvalidDateRange,

    /// A step references a dependency that is not in the checklist.
    #[error("Step {step} depends on unknown step {dependency}")]
    UnknownDependency {
        /// Declaring step.
        step: ClosureStepId,
        /// Missing dependency.
        dependency: ClosureStepId,
    },
}

impl ClosureError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PeriodNotFound(_) | Self::StepNotFound(_) => 404,
            Self::InvalidTransition { .. }
            | Self::ApproverRequired
            | Self::InvalidDateRange
            | Self::UnknownDependency { .. } => 400,
            Self::StepChanged { .. } | Self::DuplicateStep(_) => 409,
            Self::PeriodClosed(_)
            | Self::UnmetDependencies { .. }
            | Self::MandatoryStepsIncomplete(_)
            | Self::MissingApprovals(_) => 422,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound(_) => "CLOSURE_PERIOD_NOT_FOUND",
            Self::StepNotFound(_) => "CLOSURE_STEP_NOT_FOUND",
            Self::PeriodClosed(_) => "CLOSURE_PERIOD_CLOSED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::StepChanged { .. } => "STEP_CHANGED",
            Self::DuplicateStep(_) => "DUPLICATE_STEP",
            Self::UnmetDependencies { .. } => "UNMET_DEPENDENCIES",
            Self::MandatoryStepsIncomplete(_) => "MANDATORY_STEPS_INCOMPLETE",
            Self::MissingApprovals(_) => "MISSING_APPROVALS",
            Self::ApproverRequired => "APPROVER_REQUIRED",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::UnknownDependency { .. } => "UNKNOWN_DEPENDENCY",
        }
    }
}

impl From<ClosureError> for AppError {
    fn from(err: ClosureError) -> Self {
        match err.status_code() {
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            422 => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = ClosureError::InvalidTransition {
            from: StepStatus::Completed,
            to: StepStatus::InProgress,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("completed"));
        assert!(err.to_string().contains("in_progress"));
    }

    #[test]
    fn test_missing_approvals_message() {
        let err = ClosureError::MissingApprovals(vec!["DAF".to_string(), "CAC".to_string()]);
        assert_eq!(err.to_string(), "Missing approvals: DAF, CAC");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_unmet_dependencies_message() {
        let err = ClosureError::UnmetDependencies {
            step: ClosureStepId::new(),
            pending: vec![ClosureStepId::new(), ClosureStepId::new()],
        };
        assert!(err.to_string().ends_with("has 2 unmet dependencies"));
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = ClosureError::PeriodNotFound(ClosurePeriodId::new()).into();
        assert_eq!(app.error_code(), "NOT_FOUND");
        let app: AppError = ClosureError::MandatoryStepsIncomplete(3).into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");
        let app: AppError = ClosureError::DuplicateStep(ClosureStepId::new()).into();
        assert_eq!(app.error_code(), "CONFLICT");
        let app: AppError = ClosureError::ApproverRequired.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
