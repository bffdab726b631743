//! Dual-home recording of audit events.

use crate::audit::{
    domain::{ActivityEntry, ActivityId, AuditDomainError, AuditEvent, EntityRef},
    ports::{AuditLogRepository, AuditQuery, AuditRepositoryError, EntityActivityRepository},
};
use crate::config::AuditConfig;
use std::cmp::Reverse;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by audit recording and reads.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The event could not be built.
    #[error(transparent)]
    Domain(#[from] AuditDomainError),
    /// The global log rejected the event; nothing was written.
    #[error("failed to append audit event {activity_id} to the global log: {source}")]
    Global {
        /// Event that was not written.
        activity_id: ActivityId,
        /// Underlying repository error.
        #[source]
        source: AuditRepositoryError,
    },
    /// The global row exists but the entity log entry does not.
    #[error("audit event {activity_id} missing from the activity log of {entity}: {source}")]
    PartialWrite {
        /// Event written only to the global log.
        activity_id: ActivityId,
        /// Entity whose log lacks the entry.
        entity: EntityRef,
        /// Underlying repository error.
        #[source]
        source: AuditRepositoryError,
    },
    /// A read failed.
    #[error(transparent)]
    Repository(#[from] AuditRepositoryError),
}

/// Result type for audit service operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Writes audit events to the global log and the subject's activity log.
///
/// The global row is written first. If it fails nothing else is written;
/// if the entity entry then fails the event is left in the global log only
/// and [`Self::rebuild_entity_activity`] restores the entity log.
#[derive(Clone)]
pub struct AuditRecorder<L, E>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    log: Arc<L>,
    activity: Arc<E>,
    enabled: bool,
}

impl<L, E> AuditRecorder<L, E>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    /// Creates a recorder over the global and entity-scoped stores.
    #[must_use]
    pub const fn new(log: Arc<L>, activity: Arc<E>, config: &AuditConfig) -> Self {
        Self {
            log,
            activity,
            enabled: config.enabled,
        }
    }

    /// Returns `true` when events are written.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Writes an event to both homes.
    ///
    /// Does nothing when auditing is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Global`] when the global append fails, or
    /// [`AuditError::PartialWrite`] when only the global append succeeded.
    pub async fn record(&self, event: &AuditEvent) -> AuditResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.log
            .append(event)
            .await
            .map_err(|source| AuditError::Global {
                activity_id: event.id,
                source,
            })?;

        let entity = event.entity();
        if let Err(source) = self.activity.append(&entity, &event.to_entry()).await {
            tracing::error!(
                activity_id = %event.id,
                entity = %entity,
                error = %source,
                "audit event written to the global log only"
            );
            return Err(AuditError::PartialWrite {
                activity_id: event.id,
                entity,
                source,
            });
        }

        tracing::debug!(
            activity_id = %event.id,
            activity_type = %event.activity_type,
            entity = %entity,
            "audit event recorded"
        );
        Ok(())
    }

    /// Writes an event, logging and discarding any failure.
    ///
    /// Returns `true` when both homes were written.
    pub async fn record_best_effort(&self, event: &AuditEvent) -> bool {
        match self.record(event).await {
            Ok(()) => true,
            Err(AuditError::PartialWrite { .. }) => false,
            Err(err) => {
                tracing::warn!(
                    activity_id = %event.id,
                    activity_type = %event.activity_type,
                    error = %err,
                    "failed to record audit event"
                );
                false
            }
        }
    }

    /// Returns an entity's activity log, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Repository`] when the read fails.
    pub async fn entity_activity(&self, entity: &EntityRef) -> AuditResult<Vec<ActivityEntry>> {
        let mut entries = self.activity.list(entity).await?;
        entries.reverse();
        entries.sort_by_key(|entry| Reverse(entry.timestamp));
        Ok(entries)
    }

    /// Returns global log events matching the query, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Repository`] when the read fails.
    pub async fn feed(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEvent>> {
        Ok(self.log.find(query).await?)
    }

    /// Rebuilds an entity's activity log from the global log.
    ///
    /// Returns the number of entries in the rebuilt log.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Repository`] when either store fails.
    pub async fn rebuild_entity_activity(&self, entity: &EntityRef) -> AuditResult<usize> {
        let events = self.log.find_by_entity(entity).await?;
        let entries: Vec<ActivityEntry> = events.iter().map(ActivityEntry::from).collect();
        self.activity.replace(entity, &entries).await?;
        tracing::debug!(
            entity = %entity,
            entries = entries.len(),
            "entity activity log rebuilt"
        );
        Ok(entries.len())
    }
}
