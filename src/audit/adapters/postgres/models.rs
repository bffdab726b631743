//! Diesel row models for audit persistence.

use super::schema::{audit_events, entity_activity};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row model for global audit events.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditEventRow {
    /// Activity identifier.
    pub id: uuid::Uuid,
    /// Activity tag.
    pub activity_type: String,
    /// Rendered description.
    pub description: String,
    /// Acting user identifier.
    pub user_id: String,
    /// Acting user display name.
    pub user_name: String,
    /// Subject entity kind.
    pub entity_kind: String,
    /// Subject entity identifier.
    pub entity_id: String,
    /// Subject display title.
    pub entity_title: String,
    /// Operation name.
    pub operation: String,
    /// Category-specific extras.
    pub details: Value,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for entity activity entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = entity_activity)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityEntryRow {
    /// Owning entity kind.
    pub entity_kind: String,
    /// Owning entity identifier.
    pub entity_id: String,
    /// Activity identifier.
    pub id: uuid::Uuid,
    /// Acting user identifier.
    pub user_id: String,
    /// Activity tag.
    pub action: String,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
    /// Description and extras.
    pub details: Value,
    /// Acting user display name.
    pub user_name: String,
}
