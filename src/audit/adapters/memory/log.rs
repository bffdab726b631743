//! In-memory global audit log.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::{Arc, RwLock};

use crate::audit::{
    domain::{AuditEvent, EntityRef},
    ports::{AuditLogRepository, AuditQuery, AuditRepositoryError, AuditRepositoryResult},
};

/// Thread-safe in-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored events.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> AuditRepositoryResult<usize> {
        Ok(self.events.read().map_err(lock_error)?.len())
    }

    /// Returns `true` when no event has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> AuditRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_error(err: impl ToString) -> AuditRepositoryError {
    AuditRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLog {
    async fn append(&self, event: &AuditEvent) -> AuditRepositoryResult<()> {
        let mut events = self.events.write().map_err(lock_error)?;
        if events.iter().any(|stored| stored.id == event.id) {
            return Err(AuditRepositoryError::DuplicateActivity(event.id));
        }
        events.push(event.clone());
        Ok(())
    }

    async fn find(&self, query: &AuditQuery) -> AuditRepositoryResult<Vec<AuditEvent>> {
        let events = self.events.read().map_err(lock_error)?;
        // Reverse first so equal timestamps keep newest-appended first.
        let mut matching: Vec<&AuditEvent> =
            events.iter().rev().filter(|event| query.matches(event)).collect();
        matching.sort_by_key(|event| Reverse(event.created_at));
        Ok(matching
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn find_by_entity(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<AuditEvent>> {
        let events = self.events.read().map_err(lock_error)?;
        let mut matching: Vec<AuditEvent> = events
            .iter()
            .filter(|event| event.entity() == *entity)
            .cloned()
            .collect();
        matching.sort_by_key(|event| event.created_at);
        Ok(matching)
    }
}
