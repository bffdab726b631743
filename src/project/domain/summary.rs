//! Denormalized task summaries embedded in project records.

use crate::task::domain::{Progress, Task, TaskId, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read-optimized copy of the task fields shown in project list views.
///
/// Summaries are rebuilt from the authoritative [`Task`] on every task
/// write; they are never edited on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    /// Authoritative task identifier.
    pub id: TaskId,
    /// Task title.
    pub name: String,
    /// Task status.
    pub status: TaskStatus,
    /// Assignee display name, if any.
    pub assignee: Option<String>,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Task priority.
    pub priority: TaskPriority,
    /// Completion percentage.
    pub progress: Progress,
}

impl TaskSummary {
    /// Builds the summary for the current state of a task.
    #[must_use]
    pub fn of(task: &Task) -> Self {
        Self {
            id: task.id(),
            name: task.title().to_owned(),
            status: task.status(),
            assignee: task.assignee().map(str::to_owned),
            due_date: task.due_date(),
            priority: task.priority(),
            progress: task.progress(),
        }
    }
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self::of(task)
    }
}
