//! In-memory repository for project records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::project::{
    domain::{Project, ProjectId, TaskCodePrefix, TaskSummary},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ProjectRepositoryResult<RwLockReadGuard<'_, HashMap<ProjectId, Project>>> {
        self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> ProjectRepositoryResult<RwLockWriteGuard<'_, HashMap<ProjectId, Project>>> {
        self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Applies a mutation to one stored project under the write lock.
    fn modify<T>(
        &self,
        id: ProjectId,
        mutation: impl FnOnce(&mut Project) -> T,
    ) -> ProjectRepositoryResult<T> {
        let mut projects = self.write()?;
        let project = projects
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        Ok(mutation(project))
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut projects = self.write()?;
        if projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut projects = self.write()?;
        let stored = projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;

        // Keep the stored cache and sequences; only the details change.
        let mut updated = project.clone();
        updated.replace_task_summaries(stored.tasks().to_vec());
        for (prefix, number) in stored.task_sequences() {
            updated.record_issued(&TaskCodePrefix::from_persisted(prefix.clone()), *number);
        }
        *stored = updated;
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<Project> {
        let mut projects = self.write()?;
        projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let projects = self.read()?;
        Ok(projects.get(&id).cloned())
    }

    async fn push_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<()> {
        self.modify(project_id, |project| {
            project.push_task_summary(summary.clone());
        })
    }

    async fn replace_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<bool> {
        self.modify(project_id, |project| {
            project.replace_task_summary(summary.clone())
        })
    }

    async fn remove_task_summary(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> ProjectRepositoryResult<bool> {
        self.modify(project_id, |project| project.remove_task_summary(task_id))
    }

    async fn replace_task_summaries(
        &self,
        project_id: ProjectId,
        summaries: &[TaskSummary],
    ) -> ProjectRepositoryResult<()> {
        self.modify(project_id, |project| {
            project.replace_task_summaries(summaries.to_vec());
        })
    }

    async fn record_issued_number(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
        number: u64,
    ) -> ProjectRepositoryResult<()> {
        self.modify(project_id, |project| project.record_issued(prefix, number))
    }
}
