//! Repository port for project persistence and task summary maintenance.

use crate::project::domain::{Project, ProjectId, TaskCodePrefix, TaskSummary};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// The summary operations are conditional, single-document updates so that
/// concurrent task writes against the same project never overwrite each
/// other's summaries.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project
    /// ID already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists name, description and timestamp changes.
    ///
    /// Embedded summaries and high-water marks are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Deletes a project and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<Project>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Appends a task summary to the project's embedded list.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn push_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<()>;

    /// Overwrites the embedded summary with the same task identifier.
    ///
    /// Returns `false` when the project holds no summary for the task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn replace_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<bool>;

    /// Removes the embedded summary for a task.
    ///
    /// Returns `false` when the project holds no summary for the task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn remove_task_summary(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> ProjectRepositoryResult<bool>;

    /// Replaces the whole embedded summary list.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn replace_task_summaries(
        &self,
        project_id: ProjectId,
        summaries: &[TaskSummary],
    ) -> ProjectRepositoryResult<()>;

    /// Raises the high-water mark of issued numbers for a prefix.
    ///
    /// Numbers lower than the current mark are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn record_issued_number(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
        number: u64,
    ) -> ProjectRepositoryResult<()>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
