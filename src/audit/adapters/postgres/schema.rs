//! Diesel schema for audit persistence.

diesel::table! {
    /// Global append-only audit log.
    audit_events (id) {
        /// Insertion sequence, breaks timestamp ties.
        seq -> Int8,
        /// Activity identifier shared with the embedded entry.
        id -> Uuid,
        /// Activity tag.
        #[max_length = 64]
        activity_type -> Varchar,
        /// Rendered description.
        description -> Text,
        /// Acting user identifier.
        user_id -> Text,
        /// Acting user display name.
        user_name -> Text,
        /// Subject entity kind.
        #[max_length = 32]
        entity_kind -> Varchar,
        /// Subject entity identifier.
        entity_id -> Text,
        /// Subject display title.
        entity_title -> Text,
        /// Operation name.
        #[max_length = 32]
        operation -> Varchar,
        /// Category-specific extras.
        details -> Jsonb,
        /// Recording timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Activity logs embedded in individual entities.
    entity_activity (entity_kind, entity_id, id) {
        /// Insertion sequence, preserves append order.
        seq -> Int8,
        /// Owning entity kind.
        #[max_length = 32]
        entity_kind -> Varchar,
        /// Owning entity identifier.
        entity_id -> Text,
        /// Activity identifier of the mirrored global event.
        id -> Uuid,
        /// Acting user identifier.
        user_id -> Text,
        /// Activity tag.
        #[max_length = 64]
        action -> Varchar,
        /// Recording timestamp.
        timestamp -> Timestamptz,
        /// Description and extras.
        details -> Jsonb,
        /// Acting user display name.
        user_name -> Text,
    }
}
