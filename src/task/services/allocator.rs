//! Sequential task code allocation.

use crate::project::{
    domain::{ProjectId, TaskCodePrefix},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::TaskCode,
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while allocating a task code.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The project does not exist.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// Project lookup failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
}

/// Result type for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Computes the next task code for a project.
///
/// Allocation reads and never reserves: two concurrent callers may receive
/// the same code. The task store's uniqueness constraint decides which insert
/// wins and callers retry the loser (see
/// [`TaskLifecycleService::create`](super::TaskLifecycleService::create)).
#[derive(Clone)]
pub struct TaskCodeAllocator<T, P>
where
    T: TaskRepository,
    P: ProjectRepository,
{
    tasks: Arc<T>,
    projects: Arc<P>,
}

impl<T, P> TaskCodeAllocator<T, P>
where
    T: TaskRepository,
    P: ProjectRepository,
{
    /// Creates an allocator over the task and project stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>) -> Self {
        Self { tasks, projects }
    }

    /// Returns the next task code for a project.
    ///
    /// The candidate follows the greatest existing number under the project's
    /// prefix, or the project's high-water mark when that is larger. If the
    /// candidate is already held anywhere in the task collection the next
    /// number is returned without another scan.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::ProjectNotFound`] when the project does
    /// not exist, or a repository error when a lookup fails.
    pub async fn allocate(&self, project_id: ProjectId) -> AllocationResult<TaskCode> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(AllocationError::ProjectNotFound(project_id))?;
        let prefix = project.task_prefix();

        let scanned = self
            .tasks
            .find_latest_code(project_id, &prefix)
            .await?
            .map(|code| code.number());
        let last_issued = scanned.max(project.highest_issued(&prefix));
        let candidate = next_code(prefix, last_issued);

        if self.tasks.find_by_custom_id(&candidate).await?.is_some() {
            return Ok(candidate.next());
        }
        Ok(candidate)
    }

    /// Returns the code the next creation would most likely receive.
    ///
    /// Advisory only: nothing is reserved, so a concurrent creation may take
    /// the code first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::allocate`].
    pub async fn peek(&self, project_id: ProjectId) -> AllocationResult<TaskCode> {
        self.allocate(project_id).await
    }
}

fn next_code(prefix: TaskCodePrefix, last_issued: Option<u64>) -> TaskCode {
    let first = TaskCode::first(prefix);
    match last_issued {
        Some(number) if number > 0 => TaskCode::new(first.prefix().clone(), number)
            .map_or(first, |latest| latest.next()),
        _ => first,
    }
}
