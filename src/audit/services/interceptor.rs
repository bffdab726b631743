//! Response interception for task-scoped handlers.

use super::AuditRecorder;
use crate::api::{ApiResponse, RequestContext};
use crate::audit::{
    domain::{
        ActivityType, Actor, AuditEvent, AuditEventDraft, AuditSubject, EntityKind, EntityRef,
        UploadedFile, detect_changes,
    },
    ports::{AuditLogRepository, EntityActivityRepository},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;

/// Task-scoped operation wrapped by [`TaskAuditInterceptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOperation {
    /// A task is created.
    Create,
    /// Task fields are patched.
    Update(TaskId),
    /// A task is deleted.
    Delete(TaskId),
    /// A person is assigned to the task.
    AddAssignee(TaskId),
    /// A person is removed from the task.
    RemoveAssignee(TaskId),
    /// A subtask is added.
    CreateSubtask(TaskId),
    /// A subtask is edited.
    UpdateSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Subtask identifier.
        subtask_id: String,
    },
    /// A subtask is marked complete.
    CompleteSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Subtask identifier.
        subtask_id: String,
    },
    /// A subtask is removed.
    DeleteSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Subtask identifier.
        subtask_id: String,
    },
    /// A comment is posted.
    AddComment(TaskId),
    /// A comment is edited.
    UpdateComment {
        /// Parent task.
        task_id: TaskId,
        /// Comment identifier.
        comment_id: String,
    },
    /// A comment is removed.
    DeleteComment {
        /// Parent task.
        task_id: TaskId,
        /// Comment identifier.
        comment_id: String,
    },
    /// A file is attached.
    UploadFile {
        /// Parent task.
        task_id: TaskId,
        /// Accepted upload.
        file: UploadedFile,
    },
    /// An attached file is removed.
    DeleteFile {
        /// Parent task.
        task_id: TaskId,
        /// Name of the removed file.
        file_name: String,
    },
}

impl TaskOperation {
    /// Returns the task whose prior state is read before the handler runs.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Create => None,
            Self::Update(task_id)
            | Self::Delete(task_id)
            | Self::AddAssignee(task_id)
            | Self::RemoveAssignee(task_id)
            | Self::CreateSubtask(task_id)
            | Self::AddComment(task_id)
            | Self::UpdateSubtask { task_id, .. }
            | Self::CompleteSubtask { task_id, .. }
            | Self::DeleteSubtask { task_id, .. }
            | Self::UpdateComment { task_id, .. }
            | Self::DeleteComment { task_id, .. }
            | Self::UploadFile { task_id, .. }
            | Self::DeleteFile { task_id, .. } => Some(*task_id),
        }
    }
}

/// Decorator deriving audit events from a task handler's exchange.
///
/// The prior task state is read before the handler runs. Events are built
/// from the request body, the response body and that prior state, and only
/// for 2xx responses to authenticated requests. The handler's response is
/// always returned unchanged.
#[derive(Clone)]
pub struct TaskAuditInterceptor<T, L, E, C>
where
    T: TaskRepository,
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    recorder: AuditRecorder<L, E>,
    clock: Arc<C>,
}

impl<T, L, E, C> TaskAuditInterceptor<T, L, E, C>
where
    T: TaskRepository,
    L: AuditLogRepository,
    E: EntityActivityRepository,
    C: Clock + Send + Sync,
{
    /// Creates an interceptor.
    #[must_use]
    pub const fn new(tasks: Arc<T>, recorder: AuditRecorder<L, E>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            recorder,
            clock,
        }
    }

    /// Runs a handler and audits its outcome.
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
        let Some(principal) = context.principal() else {
            return handler().await;
        };
        if !self.recorder.is_enabled() {
            return handler().await;
        }

        let prior = match operation.task_id() {
            Some(task_id) => self.prior_state(task_id).await,
            None => None,
        };
        let response = handler().await;
        if !response.is_success() {
            return response;
        }

        let actor = Actor::from(principal);
        for draft in drafts_for(operation, body, &response.body, prior.as_ref()) {
            let activity_type = draft.activity_type();
            match AuditEvent::from_draft(draft, actor.clone(), &*self.clock) {
                Ok(event) => {
                    self.recorder.record_best_effort(&event).await;
                }
                Err(err) => tracing::warn!(
                    activity_type = %activity_type,
                    error = %err,
                    "failed to build audit event"
                ),
            }
        }
        response
    }

    async fn prior_state(&self, task_id: TaskId) -> Option<Task> {
        match self.tasks.find_by_id(task_id).await {
            Ok(task) => task,
            Err(err) => {
                tracing::warn!(
                    task_id = %task_id,
                    error = %err,
                    "failed to read task state before audited operation"
                );
                None
            }
        }
    }
}

fn drafts_for(
    operation: &TaskOperation,
    body: &Value,
    response: &Value,
    prior: Option<&Task>,
) -> Vec<AuditEventDraft> {
    match operation {
        TaskOperation::Create => created_draft(response).into_iter().collect(),
        TaskOperation::Update(task_id) => updated_drafts(*task_id, body, response, prior),
        TaskOperation::Delete(task_id) => {
            let mut draft =
                AuditEventDraft::new(ActivityType::TaskDeleted, subject(*task_id, prior, response));
            if let Some(code) = prior.and_then(Task::custom_id) {
                draft = draft.with_detail("customId", code.to_string());
            }
            vec![draft]
        }
        TaskOperation::AddAssignee(task_id) => vec![
            AuditEventDraft::new(ActivityType::AssigneeAdded, subject(*task_id, prior, response))
                .with_detail("assignee", assignee_of(body, response)),
        ],
        TaskOperation::RemoveAssignee(task_id) => vec![
            AuditEventDraft::new(
                ActivityType::AssigneeRemoved,
                subject(*task_id, prior, response),
            )
            .with_detail(
                "assignee",
                assignee_of(body, &json!({ "assignee": prior.and_then(Task::assignee) })),
            ),
        ],
        TaskOperation::CreateSubtask(task_id) => vec![subtask_draft(
            ActivityType::SubtaskCreated,
            subject(*task_id, prior, &Value::Null),
            text_at(response, "id"),
            body,
            response,
        )],
        TaskOperation::UpdateSubtask {
            task_id,
            subtask_id,
        } => vec![subtask_draft(
            ActivityType::SubtaskUpdated,
            subject(*task_id, prior, &Value::Null),
            Some(subtask_id.clone()),
            body,
            response,
        )],
        TaskOperation::CompleteSubtask {
            task_id,
            subtask_id,
        } => vec![subtask_draft(
            ActivityType::SubtaskCompleted,
            subject(*task_id, prior, &Value::Null),
            Some(subtask_id.clone()),
            body,
            response,
        )],
        TaskOperation::DeleteSubtask {
            task_id,
            subtask_id,
        } => vec![subtask_draft(
            ActivityType::SubtaskDeleted,
            subject(*task_id, prior, &Value::Null),
            Some(subtask_id.clone()),
            body,
            response,
        )],
        TaskOperation::AddComment(task_id) => vec![comment_draft(
            ActivityType::CommentAdded,
            subject(*task_id, prior, &Value::Null),
            text_at(response, "id"),
        )],
        TaskOperation::UpdateComment {
            task_id,
            comment_id,
        } => vec![comment_draft(
            ActivityType::CommentUpdated,
            subject(*task_id, prior, &Value::Null),
            Some(comment_id.clone()),
        )],
        TaskOperation::DeleteComment {
            task_id,
            comment_id,
        } => vec![comment_draft(
            ActivityType::CommentDeleted,
            subject(*task_id, prior, &Value::Null),
            Some(comment_id.clone()),
        )],
        TaskOperation::UploadFile { task_id, file } => vec![AuditEventDraft::file(
            ActivityType::FileUploaded,
            subject(*task_id, prior, &Value::Null),
            file,
        )],
        TaskOperation::DeleteFile { task_id, file_name } => vec![
            AuditEventDraft::new(
                ActivityType::FileDeleted,
                subject(*task_id, prior, &Value::Null),
            )
            .with_detail("fileName", file_name.clone()),
        ],
    }
}

fn created_draft(response: &Value) -> Option<AuditEventDraft> {
    let Some(task_id) = text_at(response, "id") else {
        tracing::warn!("created task response carries no id; skipping audit");
        return None;
    };
    let title = text_at(response, "title").unwrap_or_default();
    let mut draft = AuditEventDraft::new(
        ActivityType::TaskCreated,
        AuditSubject::new(EntityRef::new(EntityKind::Task, task_id), title),
    );
    for key in ["customId", "projectId"] {
        if let Some(value) = response.get(key).filter(|value| !value.is_null()) {
            draft = draft.with_detail(key, value.clone());
        }
    }
    Some(draft)
}

fn updated_drafts(
    task_id: TaskId,
    body: &Value,
    response: &Value,
    prior: Option<&Task>,
) -> Vec<AuditEventDraft> {
    let Some(previous) = prior else {
        tracing::warn!(
            task_id = %task_id,
            "prior task state unavailable; skipping field change audit"
        );
        return Vec::new();
    };
    let previous_json = match serde_json::to_value(previous) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(task_id = %task_id, error = %err, "failed to serialize prior task state");
            return Vec::new();
        }
    };

    let task_subject = subject(task_id, prior, response);
    detect_changes(&previous_json, body)
        .iter()
        .map(|change| AuditEventDraft::field_change(task_subject.clone(), change))
        .collect()
}

fn subtask_draft(
    activity_type: ActivityType,
    task_subject: AuditSubject,
    subtask_id: Option<String>,
    body: &Value,
    response: &Value,
) -> AuditEventDraft {
    let subtask_title = text_at(body, "title")
        .or_else(|| text_at(response, "title"))
        .unwrap_or_default();
    let mut draft =
        AuditEventDraft::new(activity_type, task_subject).with_detail("subtaskTitle", subtask_title);
    if let Some(id) = subtask_id {
        draft = draft.with_detail("subtaskId", id);
    }
    draft
}

fn comment_draft(
    activity_type: ActivityType,
    task_subject: AuditSubject,
    comment_id: Option<String>,
) -> AuditEventDraft {
    let draft = AuditEventDraft::new(activity_type, task_subject);
    match comment_id {
        Some(id) => draft.with_detail("commentId", id),
        None => draft,
    }
}

fn subject(task_id: TaskId, prior: Option<&Task>, response: &Value) -> AuditSubject {
    let title = text_at(response, "title")
        .or_else(|| prior.map(|task| task.title().to_owned()))
        .unwrap_or_default();
    AuditSubject::new(EntityRef::new(EntityKind::Task, task_id), title)
}

fn assignee_of(body: &Value, fallback: &Value) -> Value {
    ["assignee", "name"]
        .into_iter()
        .find_map(|key| body.get(key).filter(|value| !value.is_null()))
        .or_else(|| fallback.get("assignee").filter(|value| !value.is_null()))
        .cloned()
        .unwrap_or(Value::Null)
}

fn text_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
