//! Project aggregate root.

use super::{ProjectId, ProjectName, TaskCodePrefix, TaskSummary};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Option<String>,
    tasks: Vec<TaskSummary>,
    task_sequences: BTreeMap<String, u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: ProjectName,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted embedded task summaries, in stored order.
    pub tasks: Vec<TaskSummary>,
    /// Persisted per-prefix high-water marks.
    pub task_sequences: BTreeMap<String, u64>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with an empty task summary list.
    #[must_use]
    pub fn new(name: ProjectName, description: Option<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name,
            description,
            tasks: Vec::new(),
            task_sequences: BTreeMap::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            tasks: data.tasks,
            task_sequences: data.task_sequences,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project display name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the embedded task summaries in stored order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskSummary] {
        &self.tasks
    }

    /// Returns the embedded summary for a task, if cached.
    #[must_use]
    pub fn task_summary(&self, task_id: TaskId) -> Option<&TaskSummary> {
        self.tasks.iter().find(|summary| summary.id == task_id)
    }

    /// Returns the per-prefix high-water marks of issued task numbers.
    #[must_use]
    pub const fn task_sequences(&self) -> &BTreeMap<String, u64> {
        &self.task_sequences
    }

    /// Returns the task code prefix derived from the current name.
    #[must_use]
    pub fn task_prefix(&self) -> TaskCodePrefix {
        TaskCodePrefix::from_project_name(self.name.as_str())
    }

    /// Returns the largest task number ever issued under a prefix.
    #[must_use]
    pub fn highest_issued(&self, prefix: &TaskCodePrefix) -> Option<u64> {
        self.task_sequences.get(prefix.as_str()).copied()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the project.
    ///
    /// Codes already issued keep their old prefix; new codes use the prefix
    /// of the new name.
    pub fn rename(&mut self, name: ProjectName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Replaces the project description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Appends a task summary.
    pub fn push_task_summary(&mut self, summary: TaskSummary) {
        self.tasks.push(summary);
    }

    /// Overwrites the summary with the same task identifier in place.
    ///
    /// Returns `false` when no summary for the task is cached.
    pub fn replace_task_summary(&mut self, summary: TaskSummary) -> bool {
        match self.tasks.iter_mut().find(|entry| entry.id == summary.id) {
            Some(entry) => {
                *entry = summary;
                true
            }
            None => false,
        }
    }

    /// Removes the summary for a task.
    ///
    /// Returns `false` when no summary for the task is cached.
    pub fn remove_task_summary(&mut self, task_id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|entry| entry.id != task_id);
        self.tasks.len() != before
    }

    /// Replaces the whole summary list.
    pub fn replace_task_summaries(&mut self, summaries: Vec<TaskSummary>) {
        self.tasks = summaries;
    }

    /// Raises the high-water mark for a prefix; lower numbers are ignored.
    pub fn record_issued(&mut self, prefix: &TaskCodePrefix, number: u64) {
        let entry = self
            .task_sequences
            .entry(prefix.as_str().to_owned())
            .or_default();
        *entry = (*entry).max(number);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
