//! Keeps project task summaries in step with authoritative task records.

use crate::project::{
    domain::{ProjectId, TaskSummary},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned when the summary cache cannot be written.
///
/// The authoritative task write has already succeeded when these occur;
/// callers log them and carry on.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The project holding the cache failed to update.
    #[error("failed to synchronize task {task_id} into project {project_id}: {source}")]
    Project {
        /// Task whose summary was being written.
        task_id: TaskId,
        /// Project holding the summary.
        project_id: ProjectId,
        /// Underlying repository error.
        #[source]
        source: ProjectRepositoryError,
    },
    /// Reconciliation could not read the project or its tasks.
    #[error("failed to reconcile project {project_id}: {reason}")]
    Reconcile {
        /// Project being reconciled.
        project_id: ProjectId,
        /// Failure description.
        reason: String,
    },
}

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Outcome of rebuilding a project's summary list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Summaries added for tasks missing from the cache.
    pub added: usize,
    /// Cached summaries whose fields had drifted.
    pub refreshed: usize,
    /// Cached summaries with no matching task.
    pub dropped: usize,
    /// Summaries already matching their task.
    pub unchanged: usize,
}

impl ReconcileReport {
    /// Returns `true` when the cache already matched the tasks.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.added == 0 && self.refreshed == 0 && self.dropped == 0
    }
}

/// Writes task summaries into the owning project's embedded list.
#[derive(Clone)]
pub struct ProjectSummarySync<P, T>
where
    P: ProjectRepository,
    T: TaskRepository,
{
    projects: Arc<P>,
    tasks: Arc<T>,
}

impl<P, T> ProjectSummarySync<P, T>
where
    P: ProjectRepository,
    T: TaskRepository,
{
    /// Creates a synchronizer over the project and task stores.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>) -> Self {
        Self { projects, tasks }
    }

    /// Appends the summary of a newly created task.
    ///
    /// Unscoped tasks are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Project`] when the project update fails.
    pub async fn task_created(&self, task: &Task) -> SyncResult<()> {
        let Some(project_id) = task.project_id() else {
            return Ok(());
        };
        self.projects
            .push_task_summary(project_id, &TaskSummary::of(task))
            .await
            .map_err(|source| project_error(task.id(), project_id, source))
    }

    /// Overwrites the summary of an updated task in place.
    ///
    /// Unscoped tasks are skipped. A summary missing from the cache is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Project`] when the project update fails.
    pub async fn task_updated(&self, task: &Task) -> SyncResult<()> {
        let Some(project_id) = task.project_id() else {
            return Ok(());
        };
        let summary = TaskSummary::of(task);
        let replaced = self
            .projects
            .replace_task_summary(project_id, &summary)
            .await
            .map_err(|source| project_error(task.id(), project_id, source))?;
        if replaced {
            return Ok(());
        }

        tracing::debug!(
            task_id = %task.id(),
            project_id = %project_id,
            "task summary missing from project cache; appending"
        );
        self.projects
            .push_task_summary(project_id, &summary)
            .await
            .map_err(|source| project_error(task.id(), project_id, source))
    }

    /// Removes the summary of a deleted task.
    ///
    /// Unscoped tasks are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Project`] when the project update fails.
    pub async fn task_deleted(&self, task: &Task) -> SyncResult<()> {
        let Some(project_id) = task.project_id() else {
            return Ok(());
        };
        let removed = self
            .projects
            .remove_task_summary(project_id, task.id())
            .await
            .map_err(|source| project_error(task.id(), project_id, source))?;
        if !removed {
            tracing::debug!(
                task_id = %task.id(),
                project_id = %project_id,
                "deleted task had no cached summary"
            );
        }
        Ok(())
    }

    /// Rebuilds a project's summary list from its authoritative tasks.
    ///
    /// Summaries are ordered by task creation time.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Reconcile`] when the project or its tasks cannot
    /// be read, or [`SyncError::Project`] when the rebuilt list cannot be
    /// written.
    pub async fn reconcile(&self, project_id: ProjectId) -> SyncResult<ReconcileReport> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await
            .map_err(|err| reconcile_error(project_id, &err))?
            .ok_or_else(|| reconcile_error(project_id, &ProjectRepositoryError::NotFound(project_id)))?;
        let tasks = self
            .tasks
            .find_by_project(project_id)
            .await
            .map_err(|err: TaskRepositoryError| reconcile_error(project_id, &err))?;

        let cached: HashMap<TaskId, &TaskSummary> = project
            .tasks()
            .iter()
            .map(|summary| (summary.id, summary))
            .collect();
        let rebuilt: Vec<TaskSummary> = tasks.iter().map(TaskSummary::of).collect();

        let mut report = ReconcileReport::default();
        for summary in &rebuilt {
            match cached.get(&summary.id) {
                None => report.added += 1,
                Some(existing) if *existing != summary => report.refreshed += 1,
                Some(_) => report.unchanged += 1,
            }
        }
        report.dropped = project
            .tasks()
            .iter()
            .filter(|summary| !rebuilt.iter().any(|task| task.id == summary.id))
            .count();

        let in_order = project.tasks().len() == rebuilt.len()
            && project
                .tasks()
                .iter()
                .zip(&rebuilt)
                .all(|(cached_entry, fresh)| cached_entry == fresh);
        if !in_order {
            self.projects
                .replace_task_summaries(project_id, &rebuilt)
                .await
                .map_err(|source| SyncError::Project {
                    task_id: rebuilt.first().map_or_else(TaskId::default, |summary| summary.id),
                    project_id,
                    source,
                })?;
        }

        tracing::debug!(
            project_id = %project_id,
            added = report.added,
            refreshed = report.refreshed,
            dropped = report.dropped,
            "project task summaries reconciled"
        );
        Ok(report)
    }
}

const fn project_error(
    task_id: TaskId,
    project_id: ProjectId,
    source: ProjectRepositoryError,
) -> SyncError {
    SyncError::Project {
        task_id,
        project_id,
        source,
    }
}

fn reconcile_error(project_id: ProjectId, err: &dyn std::error::Error) -> SyncError {
    SyncError::Reconcile {
        project_id,
        reason: err.to_string(),
    }
}
