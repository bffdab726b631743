//! Repository ports for the global audit log and entity activity logs.

use crate::audit::domain::{ActivityEntry, ActivityId, ActivityType, AuditEvent, EntityRef};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit repository operations.
pub type AuditRepositoryResult<T> = Result<T, AuditRepositoryError>;

/// Filter and paging for global log queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    /// Maximum number of events returned.
    pub limit: usize,
    /// Number of newest events skipped.
    pub skip: usize,
    /// Restricts results to one activity type.
    pub activity_type: Option<ActivityType>,
    /// Restricts results to one subject entity.
    pub entity: Option<EntityRef>,
}

impl AuditQuery {
    /// Creates an unfiltered query for the newest `limit` events.
    #[must_use]
    pub const fn latest(limit: usize) -> Self {
        Self {
            limit,
            skip: 0,
            activity_type: None,
            entity: None,
        }
    }

    /// Skips the newest `skip` events.
    #[must_use]
    pub const fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Restricts results to one activity type.
    #[must_use]
    pub const fn with_activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }

    /// Restricts results to one subject entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Returns `true` when the event passes the filters.
    #[must_use]
    pub fn matches(&self, event: &AuditEvent) -> bool {
        self.activity_type
            .is_none_or(|activity_type| event.activity_type == activity_type)
            && self
                .entity
                .as_ref()
                .is_none_or(|entity| event.entity() == *entity)
    }
}

/// Append-only global audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Appends an event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::DuplicateActivity`] when the event ID
    /// already exists.
    async fn append(&self, event: &AuditEvent) -> AuditRepositoryResult<()>;

    /// Returns events matching the query, newest first.
    async fn find(&self, query: &AuditQuery) -> AuditRepositoryResult<Vec<AuditEvent>>;

    /// Returns every event about an entity, oldest first.
    async fn find_by_entity(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<AuditEvent>>;
}

/// Activity logs embedded in individual entities.
#[async_trait]
pub trait EntityActivityRepository: Send + Sync {
    /// Appends an entry to an entity's log.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::DuplicateActivity`] when the entity
    /// log already holds the entry ID.
    async fn append(&self, entity: &EntityRef, entry: &ActivityEntry)
    -> AuditRepositoryResult<()>;

    /// Returns an entity's log in append order.
    async fn list(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<ActivityEntry>>;

    /// Replaces an entity's whole log.
    async fn replace(
        &self,
        entity: &EntityRef,
        entries: &[ActivityEntry],
    ) -> AuditRepositoryResult<()>;
}

/// Errors returned by audit repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate activity identifier: {0}")]
    DuplicateActivity(ActivityId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
