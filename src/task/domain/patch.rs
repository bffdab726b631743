//! Partial task updates.

use super::{Progress, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Field patch for a task.
///
/// Absent fields are left unchanged. Nullable fields use a nested `Option`
/// so that an explicit `null` clears the value while an absent key does not
/// touch it.
///
/// # Examples
///
/// ```
/// use labtrack::task::domain::{TaskPatch, TaskStatus};
///
/// let patch: TaskPatch = serde_json::from_value(serde_json::json!({
///     "status": "in-progress",
///     "assignee": null,
/// }))
/// .expect("valid patch");
/// assert_eq!(patch.status, Some(TaskStatus::InProgress));
/// assert_eq!(patch.assignee, Some(None));
/// assert!(patch.title.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New or cleared description.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// New status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// New or cleared assignee.
    #[serde(default, deserialize_with = "present")]
    pub assignee: Option<Option<String>>,
    /// New or cleared due date.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
    /// New progress.
    #[serde(default)]
    pub progress: Option<Progress>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the status.
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

    /// Sets or clears the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
            && self.progress.is_none()
    }
}

/// Marks a key as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
