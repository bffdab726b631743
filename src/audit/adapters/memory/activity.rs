//! In-memory entity activity logs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::audit::{
    domain::{ActivityEntry, EntityRef},
    ports::{AuditRepositoryError, AuditRepositoryResult, EntityActivityRepository},
};

/// Thread-safe in-memory store of per-entity activity logs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityActivity {
    logs: Arc<RwLock<HashMap<EntityRef, Vec<ActivityEntry>>>>,
}

impl InMemoryEntityActivity {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AuditRepositoryError {
    AuditRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EntityActivityRepository for InMemoryEntityActivity {
    async fn append(
        &self,
        entity: &EntityRef,
        entry: &ActivityEntry,
    ) -> AuditRepositoryResult<()> {
        let mut logs = self.logs.write().map_err(lock_error)?;
        let log = logs.entry(entity.clone()).or_default();
        if log.iter().any(|stored| stored.id == entry.id) {
            return Err(AuditRepositoryError::DuplicateActivity(entry.id));
        }
        log.push(entry.clone());
        Ok(())
    }

    async fn list(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<ActivityEntry>> {
        let logs = self.logs.read().map_err(lock_error)?;
        Ok(logs.get(entity).cloned().unwrap_or_default())
    }

    async fn replace(
        &self,
        entity: &EntityRef,
        entries: &[ActivityEntry],
    ) -> AuditRepositoryResult<()> {
        let mut logs = self.logs.write().map_err(lock_error)?;
        logs.insert(entity.clone(), entries.to_vec());
        Ok(())
    }
}
