//! Accounting task board.

pub mod error;
pub mod service;
pub mod types;

pub use error::TaskError;
pub use service::TaskService;
pub use types::{CreateTaskInput, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTaskInput};
