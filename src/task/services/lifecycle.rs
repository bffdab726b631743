//! Service layer for task creation, editing and removal.

use super::{AllocationError, ProjectSummarySync, TaskCodeAllocator};
use crate::config::AllocationConfig;
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{
        NewTask, Progress, Task, TaskCode, TaskDomainError, TaskId, TaskPatch, TaskPriority,
        TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// Deserializes from the camel-cased JSON body accepted by the task API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    title: String,
    #[serde(default)]
    project_id: Option<ProjectId>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    priority: Option<TaskPriority>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    progress: Option<Progress>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Scopes the task to a project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the requested owning project.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    fn into_new_task(self) -> Result<NewTask, TaskDomainError> {
        let mut input = NewTask::new(self.title)?;
        if let Some(project_id) = self.project_id {
            input = input.with_project(project_id);
        }
        if let Some(description) = self.description {
            input = input.with_description(description);
        }
        if let Some(status) = self.status {
            input = input.with_status(status);
        }
        if let Some(priority) = self.priority {
            input = input.with_priority(priority);
        }
        if let Some(assignee) = self.assignee {
            input = input.with_assignee(assignee);
        }
        if let Some(due_date) = self.due_date {
            input = input.with_due_date(due_date);
        }
        if let Some(progress) = self.progress {
            input = input.with_progress(progress);
        }
        Ok(input)
    }
}

/// Before and after snapshots of an edited task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Task state before the patch.
    pub previous: Task,
    /// Task state after the patch.
    pub current: Task,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The owning project does not exist.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Every insert attempt collided with an existing task code.
    #[error("could not allocate a task code for project {project_id} after {attempts} attempts")]
    AllocationExhausted {
        /// Project the task was being created in.
        project_id: ProjectId,
        /// Number of insert attempts made.
        attempts: u32,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<AllocationError> for TaskLifecycleError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            AllocationError::Project(source) => Self::Project(source),
            AllocationError::Task(source) => source.into(),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Owns the primary task writes and drives the project summary cache
/// through [`ProjectSummarySync`] after each one. Cache failures are logged
/// and never fail the task operation.
#[derive(Clone)]
pub struct TaskLifecycleService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    allocator: TaskCodeAllocator<T, P>,
    sync: ProjectSummarySync<P, T>,
    clock: Arc<C>,
    max_attempts: u32,
}

impl<T, P, C> TaskLifecycleService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>, config: &AllocationConfig) -> Self {
        Self {
            allocator: TaskCodeAllocator::new(Arc::clone(&tasks), Arc::clone(&projects)),
            sync: ProjectSummarySync::new(Arc::clone(&projects), Arc::clone(&tasks)),
            tasks,
            projects,
            clock,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Returns the summary synchronizer used by this service.
    #[must_use]
    pub const fn summary_sync(&self) -> &ProjectSummarySync<P, T> {
        &self.sync
    }

    /// Creates and stores a new task.
    ///
    /// Project-scoped tasks receive a task code. When the insert loses a
    /// race for its code the full allocation is repeated, up to the
    /// configured attempt bound.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the input is invalid,
    /// [`TaskLifecycleError::ProjectNotFound`] when the project does not
    /// exist, [`TaskLifecycleError::AllocationExhausted`] when every attempt
    /// collided, or a repository error when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let input = request.into_new_task()?;
        let Some(project_id) = input.project_id() else {
            let task = Task::create(input, None, &*self.clock);
            self.tasks.store(&task).await?;
            return Ok(task);
        };

        let mut task = Task::create(input, None, &*self.clock);
        for attempt in 1..=self.max_attempts {
            let code = self.allocator.allocate(project_id).await?;
            task.assign_code(code.clone());
            match self.tasks.store(&task).await {
                Ok(()) => {
                    self.raise_high_water_mark(project_id, &code).await;
                    self.sync_created(&task).await;
                    return Ok(task);
                }
                Err(TaskRepositoryError::DuplicateCustomId(taken)) => {
                    tracing::debug!(
                        project_id = %project_id,
                        custom_id = %taken,
                        attempt,
                        "task code taken by a concurrent insert; reallocating"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(
            project_id = %project_id,
            attempts = self.max_attempts,
            "task code allocation exhausted"
        );
        Err(TaskLifecycleError::AllocationExhausted {
            project_id,
            attempts: self.max_attempts,
        })
    }

    /// Applies a field patch to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Domain`] when the patch is invalid, or a
    /// repository error when persistence fails.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> TaskLifecycleResult<TaskUpdate> {
        let previous = self.find(id).await?;
        let mut current = previous.clone();
        current.apply(patch, &*self.clock)?;
        self.tasks.update(&current).await?;

        if let Err(err) = self.sync.task_updated(&current).await {
            tracing::warn!(
                task_id = %current.id(),
                project_id = ?current.project_id(),
                error = %err,
                "failed to synchronize task summary after update"
            );
        }
        Ok(TaskUpdate { previous, current })
    }

    /// Deletes a task and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// or a repository error when persistence fails.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let removed = self.tasks.delete(id).await?;
        if let Err(err) = self.sync.task_deleted(&removed).await {
            tracing::warn!(
                task_id = %removed.id(),
                project_id = ?removed.project_id(),
                error = %err,
                "failed to remove task summary after delete"
            );
        }
        Ok(removed)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// or a repository error when lookup fails.
    pub async fn find(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Lists a project's tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns a repository error when lookup fails.
    pub async fn find_by_project(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.find_by_project(project_id).await?)
    }

    /// Returns the code the next task in a project would most likely get.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`] when the project does
    /// not exist, or a repository error when lookup fails.
    pub async fn peek_next_code(&self, project_id: ProjectId) -> TaskLifecycleResult<TaskCode> {
        Ok(self.allocator.peek(project_id).await?)
    }

    async fn raise_high_water_mark(&self, project_id: ProjectId, code: &TaskCode) {
        if let Err(err) = self
            .projects
            .record_issued_number(project_id, code.prefix(), code.number())
            .await
        {
            tracing::warn!(
                project_id = %project_id,
                custom_id = %code,
                error = %err,
                "failed to record issued task number"
            );
        }
    }

    async fn sync_created(&self, task: &Task) {
        if let Err(err) = self.sync.task_created(task).await {
            tracing::warn!(
                task_id = %task.id(),
                project_id = ?task.project_id(),
                error = %err,
                "failed to synchronize task summary after create"
            );
        }
    }
}
