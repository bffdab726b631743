//! Project request handlers.

use super::{
    ApiResponse, RequestContext,
    error::{ApiError, parse_id},
};
use crate::audit::{
    domain::{ActivityType, AuditEventDraft, AuditSubject, EntityKind, EntityRef, detect_changes},
    ports::{AuditLogRepository, EntityActivityRepository},
    services::DirectAuditor,
};
use crate::project::{
    domain::{Project, ProjectId},
    ports::ProjectRepository,
    services::{CreateProjectRequest, ProjectLifecycleService, UpdateProjectRequest},
};
use crate::task::{ports::TaskRepository, services::ProjectSummarySync};
use mockable::Clock;
use serde_json::{Map, Value, json};

const EDITABLE_FIELDS: [&str; 2] = ["name", "description"];

/// Handlers for project endpoints.
///
/// Mutations are audited directly after they succeed.
#[derive(Clone)]
pub struct ProjectHandlers<P, T, C, L, E>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    service: ProjectLifecycleService<P, C>,
    sync: ProjectSummarySync<P, T>,
    auditor: DirectAuditor<L, E, C>,
}

impl<P, T, C, L, E> ProjectHandlers<P, T, C, L, E>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    /// Creates the project handlers.
    #[must_use]
    pub const fn new(
        service: ProjectLifecycleService<P, C>,
        sync: ProjectSummarySync<P, T>,
        auditor: DirectAuditor<L, E, C>,
    ) -> Self {
        Self {
            service,
            sync,
            auditor,
        }
    }

    /// `POST /projects`: creates a project and answers 201.
    pub async fn create(&self, context: &RequestContext, body: &Value) -> ApiResponse {
        let result = async {
            let name = required_text(body, "name")?;
            let mut request = CreateProjectRequest::new(name);
            if let Some(description) = optional_text(body, "description")? {
                request = request.with_description(description);
            }
            let project = self.service.create(request).await?;

            self.auditor
                .record(
                    context,
                    body,
                    AuditEventDraft::new(ActivityType::ProjectCreated, subject(&project)),
                )
                .await;
            Ok::<_, ApiError>(ApiResponse::created(&project))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `PATCH /projects/{id}`: edits the name or description.
    pub async fn update(&self, context: &RequestContext, id: &str, body: &Value) -> ApiResponse {
        let result = async {
            let project_id = parse_id::<ProjectId>(id)?;
            let mut request = UpdateProjectRequest::new();
            if body.get("name").is_some() {
                request = request.with_name(required_text(body, "name")?);
            }
            if body.get("description").is_some() {
                request = request.with_description(optional_text(body, "description")?);
            }
            let update = self.service.update(project_id, request).await?;

            let changes = detect_changes(&editable_view(&update.previous), &editable_subset(body));
            if !changes.is_empty() {
                self.auditor
                    .record(
                        context,
                        body,
                        AuditEventDraft::new(ActivityType::ProjectUpdated, subject(&update.current))
                            .with_detail("changes", json!(changes)),
                    )
                    .await;
            }
            Ok::<_, ApiError>(ApiResponse::ok(&update.current))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `DELETE /projects/{id}`: deletes a project and answers with the
    /// removed record.
    pub async fn delete(&self, context: &RequestContext, id: &str, body: &Value) -> ApiResponse {
        let result = async {
            let project_id = parse_id::<ProjectId>(id)?;
            let removed = self.service.delete(project_id).await?;
            self.auditor
                .record(
                    context,
                    body,
                    AuditEventDraft::new(ActivityType::ProjectDeleted, subject(&removed)),
                )
                .await;
            Ok::<_, ApiError>(ApiResponse::ok(&removed))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `GET /projects/{id}`.
    pub async fn get(&self, id: &str) -> ApiResponse {
        let result = async {
            let project = self.service.find(parse_id::<ProjectId>(id)?).await?;
            Ok::<_, ApiError>(ApiResponse::ok(&project))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `GET /projects/{id}/activity`: the project's activity log, newest
    /// first.
    pub async fn activity(&self, id: &str) -> ApiResponse {
        let result = async {
            let project = self.service.find(parse_id::<ProjectId>(id)?).await?;
            let entries = self
                .auditor
                .recorder()
                .entity_activity(&EntityRef::new(EntityKind::Project, project.id()))
                .await?;
            Ok::<_, ApiError>(ApiResponse::ok(&entries))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `POST /projects/{id}/reconcile`: rebuilds the task summary cache
    /// and answers with the reconciliation report.
    pub async fn reconcile(&self, id: &str) -> ApiResponse {
        let result = async {
            let project = self.service.find(parse_id::<ProjectId>(id)?).await?;
            let report = self.sync.reconcile(project.id()).await?;
            Ok::<_, ApiError>(ApiResponse::ok(&report))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }
}

fn subject(project: &Project) -> AuditSubject {
    AuditSubject::new(
        EntityRef::new(EntityKind::Project, project.id()),
        project.name().as_str(),
    )
}

fn editable_view(project: &Project) -> Value {
    json!({
        "name": project.name().as_str(),
        "description": project.description(),
    })
}

fn editable_subset(body: &Value) -> Value {
    let subset: Map<String, Value> = EDITABLE_FIELDS
        .into_iter()
        .filter_map(|field| body.get(field).map(|value| (field.to_owned(), value.clone())))
        .collect();
    Value::Object(subset)
}

fn required_text(body: &Value, key: &str) -> Result<String, ApiError> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Validation(format!("`{key}` must be a string")))
}

fn optional_text(body: &Value, key: &str) -> Result<Option<String>, ApiError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ApiError::Validation(format!(
            "`{key}` must be a string or null"
        ))),
    }
}
