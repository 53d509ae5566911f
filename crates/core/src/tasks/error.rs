//! Task error types.

use ohada_shared::AppError;
use ohada_shared::types::TaskId;
use thiserror::Error;

/// Errors raised by the task service.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task not found.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// Title is blank.
    #[error("Task title is required")]
    EmptyTitle,

    /// Closed tasks only accept a reopening status change.
    #[error("Task {0} is closed")]
    Closed(TaskId),
}

impl TaskError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::EmptyTitle => 400,
            Self::Closed(_) => 422,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TASK_NOT_FOUND",
            Self::EmptyTitle => "TASK_TITLE_REQUIRED",
            Self::Closed(_) => "TASK_CLOSED",
        }
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        let msg = err.to_string();
        match err {
            TaskError::NotFound(_) => Self::NotFound(msg),
            TaskError::EmptyTitle => Self::Validation(msg),
            TaskError::Closed(_) => Self::BusinessRule(msg),
        }
    }
}
