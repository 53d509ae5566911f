//! Accounting task types.

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{ClosureStepId, TaskId, UserId};
use serde::{Deserialize, Serialize};

/// Task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
    /// Dropped.
    Cancelled,
}

impl TaskStatus {
    /// Done or cancelled.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

/// Task priority, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
    /// Urgent.
    Urgent,
}

/// An accounting task, optionally tied to a closure step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// ID.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Details.
    pub description: Option<String>,
    /// Status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Assigned user.
    pub assignee: Option<UserId>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Closure step the task contributes to.
    pub closure_step: Option<ClosureStepId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Open and past its due date.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < today)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskInput {
    /// Title.
    pub title: String,
    /// Details.
    #[serde(default)]
    pub description: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Assigned user.
    #[serde(default)]
    pub assignee: Option<UserId>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Linked closure step.
    #[serde(default)]
    pub closure_step: Option<ClosureStepId>,
}

/// Partial update of a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskInput {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Details.
    #[serde(default)]
    pub description: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Assigned user.
    #[serde(default)]
    pub assignee: Option<UserId>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Task list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only this status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Only this assignee.
    #[serde(default)]
    pub assignee: Option<UserId>,
    /// At least this priority.
    #[serde(default)]
    pub min_priority: Option<TaskPriority>,
    /// Only tasks linked to this closure step.
    #[serde(default)]
    pub closure_step: Option<ClosureStepId>,
}

impl TaskFilter {
    /// Whether `task` passes the filter.
    #[must_use]
    pub fn accepts(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.assignee.is_none_or(|a| task.assignee == Some(a))
            && self.min_priority.is_none_or(|p| task.priority >= p)
            && self.closure_step.is_none_or(|s| task.closure_step == Some(s))
    }
}
