//! Shared fixtures and store doubles for audit tests.

use std::sync::Arc;

use crate::audit::{
    adapters::memory::{InMemoryAuditLog, InMemoryEntityActivity},
    domain::{
        ActivityEntry, ActivityType, Actor, AuditEvent, AuditEventDraft, AuditSubject,
        EntityKind, EntityRef,
    },
    ports::{
        AuditLogRepository, AuditQuery, AuditRepositoryError, AuditRepositoryResult,
        EntityActivityRepository,
    },
    services::AuditRecorder,
};
use crate::config::AuditConfig;
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;

mock! {
    pub AuditLog {}

    #[async_trait]
    impl AuditLogRepository for AuditLog {
        async fn append(&self, event: &AuditEvent) -> AuditRepositoryResult<()>;
        async fn find(&self, query: &AuditQuery) -> AuditRepositoryResult<Vec<AuditEvent>>;
        async fn find_by_entity(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<AuditEvent>>;
    }
}

mock! {
    pub EntityActivity {}

    #[async_trait]
    impl EntityActivityRepository for EntityActivity {
        async fn append(&self, entity: &EntityRef, entry: &ActivityEntry) -> AuditRepositoryResult<()>;
        async fn list(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<ActivityEntry>>;
        async fn replace(&self, entity: &EntityRef, entries: &[ActivityEntry]) -> AuditRepositoryResult<()>;
    }
}

pub(super) type MemoryRecorder = AuditRecorder<InMemoryAuditLog, InMemoryEntityActivity>;

/// Recorder over fresh in-memory stores, with handles to both.
pub(super) struct MemoryAudit {
    pub log: Arc<InMemoryAuditLog>,
    pub activity: Arc<InMemoryEntityActivity>,
    pub recorder: MemoryRecorder,
}

impl MemoryAudit {
    pub fn new(config: &AuditConfig) -> Self {
        let log = Arc::new(InMemoryAuditLog::new());
        let activity = Arc::new(InMemoryEntityActivity::new());
        Self {
            recorder: AuditRecorder::new(Arc::clone(&log), Arc::clone(&activity), config),
            log,
            activity,
        }
    }

    pub async fn all_events(&self) -> Vec<AuditEvent> {
        self.log
            .find(&AuditQuery::latest(usize::MAX))
            .await
            .expect("feed read succeeds")
    }
}

pub(super) fn outage() -> AuditRepositoryError {
    AuditRepositoryError::persistence(std::io::Error::other("audit store unavailable"))
}

pub(super) fn task_event(task_id: &str, title: &str) -> AuditEvent {
    AuditEvent::from_draft(
        AuditEventDraft::new(
            ActivityType::TaskCreated,
            AuditSubject::new(EntityRef::new(EntityKind::Task, task_id), title),
        ),
        Actor::new("u-1", "Ada"),
        &DefaultClock,
    )
    .expect("event builds")
}
