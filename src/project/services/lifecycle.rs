//! Service layer for project creation, editing and removal.

use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectName},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for editing project details.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<Option<String>>,
}

impl UpdateProjectRequest {
    /// Creates an empty edit request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the project.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }
}

/// Before and after snapshots of an edited project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    /// Project state before the edit.
    pub previous: Project,
    /// Project state after the edit.
    pub current: Project,
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    NotFound(ProjectId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(ProjectRepositoryError),
}

impl From<ProjectRepositoryError> for ProjectLifecycleError {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for project service operations.
pub type ProjectLifecycleResult<T> = Result<T, ProjectLifecycleError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectLifecycleService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    clock: Arc<C>,
}

impl<P, C> ProjectLifecycleService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(repository: Arc<P>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Domain`] when the name is blank, or a
    /// repository error when persistence fails.
    pub async fn create(&self, request: CreateProjectRequest) -> ProjectLifecycleResult<Project> {
        let name = ProjectName::new(request.name)?;
        let description = normalize_description(request.description);
        let project = Project::new(name, description, &*self.clock);
        self.repository.store(&project).await?;
        Ok(project)
    }

    /// Applies an edit to project details.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] when the project does not
    /// exist, [`ProjectLifecycleError::Domain`] when the new name is blank,
    /// or a repository error when persistence fails.
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectLifecycleResult<ProjectUpdate> {
        let name = request.name.map(ProjectName::new).transpose()?;
        let previous = self.find_or_error(id).await?;
        let mut current = previous.clone();

        if let Some(new_name) = name {
            current.rename(new_name, &*self.clock);
        }
        if let Some(description) = request.description {
            current.set_description(normalize_description(description), &*self.clock);
        }

        self.repository.update_details(&current).await?;
        Ok(ProjectUpdate { previous, current })
    }

    /// Deletes a project and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] when the project does not
    /// exist, or a repository error when persistence fails.
    pub async fn delete(&self, id: ProjectId) -> ProjectLifecycleResult<Project> {
        Ok(self.repository.delete(id).await?)
    }

    /// Retrieves a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] when the project does not
    /// exist, or a repository error when lookup fails.
    pub async fn find(&self, id: ProjectId) -> ProjectLifecycleResult<Project> {
        self.find_or_error(id).await
    }

    async fn find_or_error(&self, id: ProjectId) -> ProjectLifecycleResult<Project> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProjectLifecycleError::NotFound(id))
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
