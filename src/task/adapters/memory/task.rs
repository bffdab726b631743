//! In-memory repository for task records.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::{ProjectId, TaskCodePrefix};
use crate::task::{
    domain::{Task, TaskCode, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Enforces task code uniqueness the same way the unique index does in
/// `PostgreSQL`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    code_index: HashMap<String, TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        if let Some(code) = task.custom_id() {
            let key = code.to_string();
            if state.code_index.contains_key(&key) {
                return Err(TaskRepositoryError::DuplicateCustomId(code.clone()));
            }
            state.code_index.insert(key, task.id());
        }

        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        if let Some(code) = removed.custom_id() {
            state.code_index.remove(&code.to_string());
        }
        Ok(removed)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_custom_id(&self, code: &TaskCode) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let task = state
            .code_index
            .get(&code.to_string())
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == Some(project_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn find_latest_code(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
    ) -> TaskRepositoryResult<Option<TaskCode>> {
        let pattern = Regex::new(&prefix.code_pattern()).map_err(TaskRepositoryError::persistence)?;
        let state = self.state.read().map_err(lock_error)?;
        let latest = state
            .tasks
            .values()
            .filter(|task| task.project_id() == Some(project_id))
            .filter_map(Task::custom_id)
            .filter(|code| pattern.is_match(&code.to_string()))
            .max_by_key(|code| code.number())
            .cloned();
        Ok(latest)
    }
}
