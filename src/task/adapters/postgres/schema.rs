//! Diesel schema for task persistence.

diesel::table! {
    /// Authoritative task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Human-readable task code, unique across all tasks.
        #[max_length = 64]
        custom_id -> Nullable<Varchar>,
        /// Owning project, if any.
        project_id -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Assignee display name.
        #[max_length = 255]
        assignee -> Nullable<Varchar>,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Completion percentage.
        progress -> Int2,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
