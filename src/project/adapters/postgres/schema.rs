//! Diesel schema for project persistence.

diesel::table! {
    /// Project records with their embedded task summary cache.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name, source of the task code prefix.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Embedded task summaries as a JSON array.
        tasks -> Jsonb,
        /// Per-prefix high-water marks as a JSON object.
        task_sequences -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
