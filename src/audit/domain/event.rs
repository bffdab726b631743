//! Audit events and the entity-scoped entries derived from them.

use super::{
    ActivityId, ActivityType, Actor, AuditDomainError, AuditSubject, EntityKind, EntityRef,
    FieldChange, UploadedFile,
    describe::{DETAIL_FIELD, DETAIL_NEW_VALUE, DETAIL_OLD_VALUE, describe},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata stored with every global audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMeta {
    /// Kind of the subject entity.
    pub entity_kind: EntityKind,
    /// Subject entity identifier.
    pub entity_id: String,
    /// Subject display title at the time of the event.
    pub entity_title: String,
    /// Operation name, such as `create` or `complete`.
    pub operation: String,
    /// Category-specific extras.
    pub details: Map<String, Value>,
}

/// Immutable record of one state-changing action, as stored in the global
/// log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Identifier shared with the embedded entry.
    pub id: ActivityId,
    /// Fixed activity tag.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Rendered human-readable description.
    pub description: String,
    /// Acting user.
    pub user: Actor,
    /// Subject and category metadata.
    pub meta: AuditMeta,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Builds an event from a draft, rendering its description.
    ///
    /// # Errors
    ///
    /// Returns [`AuditDomainError::Template`] when the description cannot be
    /// rendered.
    pub fn from_draft(
        draft: AuditEventDraft,
        user: Actor,
        clock: &impl Clock,
    ) -> Result<Self, AuditDomainError> {
        let description = describe(
            draft.activity_type,
            &user.name,
            &draft.subject.title,
            &draft.details,
        )?;
        let AuditEventDraft {
            activity_type,
            subject,
            operation,
            details,
        } = draft;

        Ok(Self {
            id: ActivityId::new(),
            activity_type,
            description,
            user,
            meta: AuditMeta {
                entity_kind: subject.entity.kind,
                entity_id: subject.entity.id,
                entity_title: subject.title,
                operation: operation.unwrap_or_else(|| activity_type.operation().to_owned()),
                details,
            },
            created_at: clock.utc(),
        })
    }

    /// Returns the entity whose activity log receives this event.
    #[must_use]
    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.meta.entity_kind, &self.meta.entity_id)
    }

    /// Returns the embedded entry mirroring this event.
    #[must_use]
    pub fn to_entry(&self) -> ActivityEntry {
        ActivityEntry::from(self)
    }
}

/// Event contents before the actor and timestamp are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEventDraft {
    activity_type: ActivityType,
    subject: AuditSubject,
    operation: Option<String>,
    details: Map<String, Value>,
}

impl AuditEventDraft {
    /// Creates a draft with no details.
    #[must_use]
    pub fn new(activity_type: ActivityType, subject: AuditSubject) -> Self {
        Self {
            activity_type,
            subject,
            operation: None,
            details: Map::new(),
        }
    }

    /// Creates a `task_updated` draft describing one field change.
    #[must_use]
    pub fn field_change(subject: AuditSubject, change: &FieldChange) -> Self {
        Self::new(ActivityType::TaskUpdated, subject)
            .with_detail(DETAIL_FIELD, change.field.clone())
            .with_detail(DETAIL_OLD_VALUE, change.old_value.clone())
            .with_detail(DETAIL_NEW_VALUE, change.new_value.clone())
    }

    /// Creates a draft carrying upload metadata.
    #[must_use]
    pub fn file(activity_type: ActivityType, subject: AuditSubject, file: &UploadedFile) -> Self {
        Self::new(activity_type, subject).with_details(file.details())
    }

    /// Adds one detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Merges detail entries.
    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details.extend(details);
        self
    }

    /// Overrides the operation name derived from the activity type.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Returns the activity type.
    #[must_use]
    pub const fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    /// Returns the subject.
    #[must_use]
    pub const fn subject(&self) -> &AuditSubject {
        &self.subject
    }

    /// Returns the details collected so far.
    #[must_use]
    pub const fn details(&self) -> &Map<String, Value> {
        &self.details
    }
}

/// Entry in an entity's own activity log.
///
/// Shares its identifier with the global [`AuditEvent`] it mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Identifier of the mirrored global event.
    pub id: ActivityId,
    /// Acting user identifier.
    pub user_id: String,
    /// Activity tag.
    pub action: ActivityType,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
    /// Description and category-specific extras.
    pub details: Value,
    /// Acting user display name.
    pub user: String,
}

impl From<&AuditEvent> for ActivityEntry {
    fn from(event: &AuditEvent) -> Self {
        let mut details = event.meta.details.clone();
        details.insert(
            "description".to_owned(),
            Value::String(event.description.clone()),
        );
        Self {
            id: event.id,
            user_id: event.user.id.clone(),
            action: event.activity_type,
            timestamp: event.created_at,
            details: Value::Object(details),
            user: event.user.name.clone(),
        }
    }
}
