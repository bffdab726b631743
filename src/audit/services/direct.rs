//! Explicit auditing for handlers that record after their own mutation.

use super::AuditRecorder;
use crate::api::RequestContext;
use crate::audit::{
    domain::{ActivityId, Actor, AuditEvent, AuditEventDraft},
    ports::{AuditLogRepository, EntityActivityRepository},
};
use crate::config::AuditConfig;
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Records audit events on behalf of project, compliance, audit and
/// training handlers.
///
/// Callers invoke [`Self::record`] after their mutation succeeds and before
/// building the response.
#[derive(Clone)]
pub struct DirectAuditor<L, E, C>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    recorder: AuditRecorder<L, E>,
    clock: Arc<C>,
    config: AuditConfig,
}

impl<L, E, C> DirectAuditor<L, E, C>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    /// Creates an auditor.
    #[must_use]
    pub const fn new(recorder: AuditRecorder<L, E>, clock: Arc<C>, config: AuditConfig) -> Self {
        Self {
            recorder,
            clock,
            config,
        }
    }

    /// Returns the underlying recorder.
    #[must_use]
    pub const fn recorder(&self) -> &AuditRecorder<L, E> {
        &self.recorder
    }

    /// Builds and records one event.
    ///
    /// The actor is the request principal, falling back to the body, the
    /// headers and finally the anonymous identity. Failures are logged and
    /// swallowed; the returned identifier is `None` when nothing was fully
    /// recorded.
    pub async fn record(
        &self,
        context: &RequestContext,
        body: &Value,
        draft: AuditEventDraft,
    ) -> Option<ActivityId> {
        if !self.recorder.is_enabled() {
            return None;
        }

        let actor = Actor::resolve(context.principal(), body, context.headers(), &self.config);
        let activity_type = draft.activity_type();
        let event = match AuditEvent::from_draft(draft, actor, &*self.clock) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(
                    activity_type = %activity_type,
                    error = %err,
                    "failed to build audit event"
                );
                return None;
            }
        };

        self.recorder
            .record_best_effort(&event)
            .await
            .then_some(event.id)
    }
}
