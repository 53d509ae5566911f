//! Task board service.

use chrono::{NaiveDate, Utc};
use ohada_shared::types::TaskId;
use tracing::info;

use super::error::TaskError;
use super::types::{CreateTaskInput, Task, TaskFilter, TaskStatus, UpdateTaskInput};
use crate::store::MemoryStore;

/// Accounting task board.
#[derive(Default)]
pub struct TaskService {
    tasks: MemoryStore<TaskId, Task>,
}

impl TaskService {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task in `Todo`.
    pub fn create(&self, input: CreateTaskInput) -> Result<Task, TaskError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title,
            description: input.description,
            status: TaskStatus::Todo,
            priority: input.priority,
            assignee: input.assignee,
            due_date: input.due_date,
            closure_step: input.closure_step,
            created_at: now,
            updated_at: now,
        };

        info!(task_id = %task.id, title = %task.title, "Task created");
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    /// Returns a task.
    pub fn get(&self, id: TaskId) -> Result<Task, TaskError> {
        self.tasks.get(&id).ok_or(TaskError::NotFound(id))
    }

    /// Lists tasks matching `filter`: highest priority first, then by due date
    /// (undated last).
    #[must_use]
    pub fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks = self.tasks.filter(|t| filter.accepts(t));
        tasks.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        tasks
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTitle` for a blank title and `Closed` when editing a
    /// done or cancelled task without reopening it.
    pub fn update(&self, id: TaskId, input: UpdateTaskInput) -> Result<Task, TaskError> {
        let title = match input.title.as_deref().map(str::trim) {
            Some("") => return Err(TaskError::EmptyTitle),
            other => other.map(str::to_string),
        };

        let task = self
            .tasks
            .update(&id, |task| {
                let reopening = input.status.is_some_and(|s| !s.is_closed());
                if task.status.is_closed() && !reopening {
                    return Err(TaskError::Closed(id));
                }
                if let Some(title) = title {
                    task.title = title;
                }
                if input.description.is_some() {
                    task.description = input.description;
                }
                if let Some(status) = input.status {
                    task.status = status;
                }
                if let Some(priority) = input.priority {
                    task.priority = priority;
                }
                if input.assignee.is_some() {
                    task.assignee = input.assignee;
                }
                if input.due_date.is_some() {
                    task.due_date = input.due_date;
                }
                task.updated_at = Utc::now();
                Ok(task.clone())
            })
            .ok_or(TaskError::NotFound(id))??;

        info!(task_id = %id, status = ?task.status, "Task updated");
        Ok(task)
    }

    /// Deletes a task.
    pub fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        self.tasks.remove(&id).ok_or(TaskError::NotFound(id))?;
        info!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// Open tasks whose due date is before `today`, oldest due date first.
    #[must_use]
    pub fn overdue(&self, today: NaiveDate) -> Vec<Task> {
        let mut tasks = self.tasks.filter(|t| t.is_overdue(today));
        tasks.sort_by_key(|t| t.due_date);
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::types::TaskPriority;
    use ohada_shared::types::UserId;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn task(title: &str, priority: TaskPriority, due: Option<NaiveDate>) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            priority,
            due_date: due,
            ..CreateTaskInput::default()
        }
    }

    #[test]
    fn test_create_requires_title() {
        let service = TaskService::new();
        assert!(matches!(
            service.create(task("   ", TaskPriority::Low, None)),
            Err(TaskError::EmptyTitle)
        ));
        let created = service
            .create(task(" Lettrage 411 ", TaskPriority::High, None))
            .unwrap();
        assert_eq!(created.title, "Lettrage 411");
        assert_eq!(created.status, TaskStatus::Todo);
    }

    #[test]
    fn test_list_orders_by_priority_then_due_date() {
        let service = TaskService::new();
        service.create(task("Sans date", TaskPriority::High, None)).unwrap();
        service.create(task("Tardive", TaskPriority::High, Some(date(3, 31)))).unwrap();
        service.create(task("Urgente", TaskPriority::Urgent, None)).unwrap();
        service.create(task("Proche", TaskPriority::High, Some(date(3, 10)))).unwrap();
        service.create(task("Faible", TaskPriority::Low, Some(date(1, 1)))).unwrap();

        let titles: Vec<String> = service
            .list(&TaskFilter::default())
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Urgente", "Proche", "Tardive", "Sans date", "Faible"]);

        let high = TaskFilter {
            min_priority: Some(TaskPriority::High),
            ..TaskFilter::default()
        };
        assert_eq!(service.list(&high).len(), 4);
    }

    #[test]
    fn test_filter_by_assignee() {
        let service = TaskService::new();
        let user = UserId::new();
        service
            .create(CreateTaskInput {
                assignee: Some(user),
                ..task("Rapprochement", TaskPriority::Medium, None)
            })
            .unwrap();
        service.create(task("Autre", TaskPriority::Medium, None)).unwrap();

        let mine = TaskFilter {
            assignee: Some(user),
            ..TaskFilter::default()
        };
        assert_eq!(service.list(&mine).len(), 1);
    }

    #[test]
    fn test_closed_task_requires_reopening() {
        let service = TaskService::new();
        let created = service.create(task("TVA", TaskPriority::High, None)).unwrap();

        service
            .update(
                created.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Done),
                    ..UpdateTaskInput::default()
                },
            )
            .unwrap();

        assert!(matches!(
            service.update(
                created.id,
                UpdateTaskInput {
                    title: Some("TVA collectée".to_string()),
                    ..UpdateTaskInput::default()
                }
            ),
            Err(TaskError::Closed(_))
        ));

        let reopened = service
            .update(
                created.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::InProgress),
                    title: Some("TVA collectée".to_string()),
                    ..UpdateTaskInput::default()
                },
            )
            .unwrap();
        assert_eq!(reopened.status, TaskStatus::InProgress);
        assert_eq!(reopened.title, "TVA collectée");
    }

    #[test]
    fn test_overdue() {
        let service = TaskService::new();
        service.create(task("En retard", TaskPriority::Low, Some(date(2, 1)))).unwrap();
        service.create(task("Plus en retard", TaskPriority::Low, Some(date(1, 15)))).unwrap();
        service.create(task("A temps", TaskPriority::Low, Some(date(6, 1)))).unwrap();
        service.create(task("Échéance du jour", TaskPriority::Low, Some(date(3, 1)))).unwrap();
        let done = service.create(task("Faite", TaskPriority::Low, Some(date(1, 1)))).unwrap();
        service
            .update(
                done.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Done),
                    ..UpdateTaskInput::default()
                },
            )
            .unwrap();

        let overdue: Vec<String> = service
            .overdue(date(3, 1))
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(overdue, vec!["Plus en retard", "En retard"]);
    }

    #[test]
    fn test_delete() {
        let service = TaskService::new();
        let created = service.create(task("Inventaire", TaskPriority::Low, None)).unwrap();
        service.delete(created.id).unwrap();
        assert!(matches!(service.get(created.id), Err(TaskError::NotFound(_))));
        assert!(matches!(service.delete(created.id), Err(TaskError::NotFound(_))));
    }
}
