//! Repository port for task persistence and task code lookups.

use crate::project::domain::{ProjectId, TaskCodePrefix};
use crate::task::domain::{Task, TaskCode, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// The store is the final arbiter of task code uniqueness: two inserts
    /// carrying the same code never both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateCustomId`] when another task
    /// already holds the task code, or
    /// [`TaskRepositoryError::DuplicateTask`] when the task ID exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists field changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Hard-deletes a task and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Finds a task by internal task identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the task holding a task code, across all projects.
    ///
    /// Returns `None` when the code is free.
    async fn find_by_custom_id(&self, code: &TaskCode) -> TaskRepositoryResult<Option<Task>>;

    /// Returns a project's tasks ordered by creation time.
    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the project's task code with the greatest number under the
    /// prefix, considering only codes matching [`TaskCodePrefix::code_pattern`].
    ///
    /// Returns `None` when the project has no code under the prefix.
    async fn find_latest_code(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
    ) -> TaskRepositoryResult<Option<TaskCode>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Another task already holds the task code.
    #[error("duplicate task code: {0}")]
    DuplicateCustomId(TaskCode),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
