//! Task request handlers.

use super::{
    ApiResponse, RequestContext,
    error::{ApiError, parse_body, parse_id},
};
use crate::audit::{
    domain::{EntityKind, EntityRef},
    ports::{AuditLogRepository, EntityActivityRepository},
    services::{AuditRecorder, TaskAuditInterceptor, TaskOperation},
};
use crate::project::{domain::ProjectId, ports::ProjectRepository};
use crate::task::{
    domain::{TaskId, TaskPatch},
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::Clock;
use serde_json::{Value, json};
use std::future::Future;

/// Handlers for task endpoints.
///
/// Every mutation runs inside the [`TaskAuditInterceptor`].
#[derive(Clone)]
pub struct TaskHandlers<T, P, C, L, E>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    service: TaskLifecycleService<T, P, C>,
    interceptor: TaskAuditInterceptor<T, L, E, C>,
    recorder: AuditRecorder<L, E>,
}

impl<T, P, C, L, E> TaskHandlers<T, P, C, L, E>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
    L: AuditLogRepository,
    E: EntityActivityRepository,
{
    /// Creates the task handlers.
    #[must_use]
    pub const fn new(
        service: TaskLifecycleService<T, P, C>,
        interceptor: TaskAuditInterceptor<T, L, E, C>,
        recorder: AuditRecorder<L, E>,
    ) -> Self {
        Self {
            service,
            interceptor,
            recorder,
        }
    }

    /// `POST /tasks`: creates a task and answers 201 with its JSON.
    pub async fn create(&self, context: &RequestContext, body: &Value) -> ApiResponse {
        self.interceptor
            .intercept(context, &TaskOperation::Create, body, || async {
                self.create_task(body)
                    .await
                    .unwrap_or_else(ApiError::into_response)
            })
            .await
    }

    /// `PATCH /tasks/{id}`: applies a field patch.
    pub async fn update(&self, context: &RequestContext, id: &str, body: &Value) -> ApiResponse {
        let task_id = match parse_id::<TaskId>(id) {
            Ok(task_id) => task_id,
            Err(err) => return err.into_response(),
        };
        self.interceptor
            .intercept(context, &TaskOperation::Update(task_id), body, || async {
                self.update_task(task_id, body)
                    .await
                    .unwrap_or_else(ApiError::into_response)
            })
            .await
    }

    /// `DELETE /tasks/{id}`: deletes a task and answers with the removed
    /// record.
    pub async fn delete(&self, context: &RequestContext, id: &str) -> ApiResponse {
        let task_id = match parse_id::<TaskId>(id) {
            Ok(task_id) => task_id,
            Err(err) => return err.into_response(),
        };
        self.interceptor
            .intercept(context, &TaskOperation::Delete(task_id), &Value::Null, || async {
                match self.service.delete(task_id).await {
                    Ok(removed) => ApiResponse::ok(&removed),
                    Err(err) => ApiError::from(err).into_response(),
                }
            })
            .await
    }

    /// `GET /tasks/{id}`.
    pub async fn get(&self, id: &str) -> ApiResponse {
        let result = async {
            let task_id = parse_id::<TaskId>(id)?;
            let task = self.service.find(task_id).await?;
            Ok::<_, ApiError>(ApiResponse::ok(&task))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `GET /projects/{id}/next-task-code`: previews the next task code.
    pub async fn peek_next_code(&self, project_id: &str) -> ApiResponse {
        let result = async {
            let id = parse_id::<ProjectId>(project_id)?;
            let code = self.service.peek_next_code(id).await?;
            Ok::<_, ApiError>(ApiResponse::ok(&json!({ "customId": code.to_string() })))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// `GET /tasks/{id}/activity`: the task's activity log, newest first.
    pub async fn activity(&self, id: &str) -> ApiResponse {
        let result = async {
            let task_id = parse_id::<TaskId>(id)?;
            self.service.find(task_id).await?;
            let entries = self
                .recorder
                .entity_activity(&EntityRef::new(EntityKind::Task, task_id))
                .await?;
            Ok::<_, ApiError>(ApiResponse::ok(&entries))
        }
        .await;
        result.unwrap_or_else(ApiError::into_response)
    }

    /// Wraps another task-scoped handler (subtasks, comments, files,
    /// assignees) in the audit interceptor.
    pub async fn intercept<F, Fut>(
        &self,
        context: &RequestContext,
        operation: &TaskOperation,
        body: &Value,
        handler: F,
    ) -> ApiResponse
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResponse>,
    {
        self.interceptor
            .intercept(context, operation, body, handler)
            .await
    }

    async fn create_task(&self, body: &Value) -> Result<ApiResponse, ApiError> {
        let request: CreateTaskRequest = parse_body(body)?;
        let task = self.service.create(request).await?;
        Ok(ApiResponse::created(&task))
    }

    async fn update_task(&self, task_id: TaskId, body: &Value) -> Result<ApiResponse, ApiError> {
        let patch: TaskPatch = parse_body(body)?;
        let update = self.service.update(task_id, &patch).await?;
        Ok(ApiResponse::ok(&update.current))
    }
}
