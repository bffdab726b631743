//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task code, if scoped.
    pub custom_id: Option<String>,
    /// Owning project, if any.
    pub project_id: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Assignee display name.
    pub assignee: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Completion percentage.
    pub progress: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task code, if scoped.
    pub custom_id: Option<String>,
    /// Owning project, if any.
    pub project_id: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Assignee display name.
    pub assignee: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Completion percentage.
    pub progress: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Raw-query row carrying only a task code.
#[derive(Debug, Clone, QueryableByName)]
pub struct TaskCodeRow {
    /// Task code.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub custom_id: String,
}
