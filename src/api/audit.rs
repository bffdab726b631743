//! Audit feed handlers and the direct-audit entry point for records
//! managed outside this crate.

use super::{
    ApiResponse, RequestContext,
    error::{ApiError, parse_body},
};
use crate::audit::{
    domain::{ActivityId, ActivityType, AuditEventDraft, EntityKind, EntityRef},
    ports::{AuditLogRepository, AuditQuery, EntityActivityRepository},
    services::DirectAuditor,
};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;

/// Query parameters accepted by the activity feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedParams {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    skip: Option<usize>,
    #[serde(default, rename = "type")]
    activity_type: Option<String>,
    #[serde(default)]
    entity_kind: Option<String>,
    #[serde(default)]
    entity_id: Option<String>,
}

/// Handlers for the global activity feed and entity activity logs.
#[derive(Clone)]
pub struct AuditHandlers<L, E, C>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    auditor: DirectAuditor<L, E, C>,
    page_size: usize,
}

impl<L, E, C> AuditHandlers<L, E, C>
where
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    /// Creates the audit handlers with the default feed page size.
    #[must_use]
    pub const fn new(auditor: DirectAuditor<L, E, C>, page_size: usize) -> Self {
        Self { auditor, page_size }
    }

    /// Records an event for a compliance, audit or training mutation that
    /// has already succeeded.
    ///
    /// Failures are logged and swallowed.
    pub async fn record_direct(
        &self,
        context: &RequestContext,
        body: &Value,
        draft: AuditEventDraft,
    ) -> Option<ActivityId> {
        self.auditor.record(context, body, draft).await
    }

    /// `GET /activity`: the global log, newest first.
    ///
    /// Accepts `limit`, `skip`, `type`, `entityKind` and `entityId`.
    pub async fn feed(&self, params: &Value) -> ApiResponse {
        let result = async {
            let parsed = if params.is_null() {
                FeedParams::default()
            } else {
                parse_body(params)?
            };
            let query = self.feed_query(parsed)?;
            let events = self.auditor.recorder().feed(&query).await?;
            Ok::<_, ApiError>(ApiResponse::ok(&events))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `GET /{kind}/{id}/activity` for any audited entity kind.
    pub async fn entity_activity(&self, kind: &str, id: &str) -> ApiResponse {
        let result = async {
            let entity_kind =
                EntityKind::try_from(kind).map_err(|err| ApiError::Validation(err.to_string()))?;
            let entries = self
                .auditor
                .recorder()
                .entity_activity(&EntityRef::new(entity_kind, id))
                .await?;
            Ok::<_, ApiError>(ApiResponse::ok(&entries))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    fn feed_query(&self, params: FeedParams) -> Result<AuditQuery, ApiError> {
        let mut query = AuditQuery::latest(params.limit.unwrap_or(self.page_size))
            .with_skip(params.skip.unwrap_or_default());
        if let Some(tag) = params.activity_type {
            let activity_type = ActivityType::try_from(tag.as_str())
                .map_err(|err| ApiError::Validation(err.to_string()))?;
            query = query.with_activity_type(activity_type);
        }
        match (params.entity_kind, params.entity_id) {
            (Some(kind), Some(id)) => {
                let entity_kind = EntityKind::try_from(kind.as_str())
                    .map_err(|err| ApiError::Validation(err.to_string()))?;
                query = query.with_entity(EntityRef::new(entity_kind, id));
            }
            (None, None) => {}
            _ => {
                return Err(ApiError::Validation(
                    "`entityKind` and `entityId` must be given together".to_owned(),
                ));
            }
        }
        Ok(query)
    }
}
