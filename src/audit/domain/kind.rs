//! Activity taxonomy and audit subjects.

use super::AuditDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed tag identifying what an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// A task was created.
    TaskCreated,
    /// One field of a task changed.
    TaskUpdated,
    /// A task was deleted.
    TaskDeleted,
    /// A person was assigned to a task.
    AssigneeAdded,
    /// A person was removed from a task.
    AssigneeRemoved,
    /// A subtask was added to a task.
    SubtaskCreated,
    /// A subtask was edited.
    SubtaskUpdated,
    /// A subtask was marked complete.
    SubtaskCompleted,
    /// A subtask was removed.
    SubtaskDeleted,
    /// A comment was posted on a task.
    CommentAdded,
    /// A comment was edited.
    CommentUpdated,
    /// A comment was removed.
    CommentDeleted,
    /// A file was attached to a task.
    FileUploaded,
    /// An attached file was removed.
    FileDeleted,
    /// A project was created.
    ProjectCreated,
    /// Project details changed.
    ProjectUpdated,
    /// A project was deleted.
    ProjectDeleted,
    /// A compliance item was created.
    ComplianceItemCreated,
    /// A compliance item changed.
    ComplianceItemUpdated,
    /// A compliance item was deleted.
    ComplianceItemDeleted,
    /// A corrective action was added to a compliance item.
    ComplianceActionAdded,
    /// A corrective action changed.
    ComplianceActionUpdated,
    /// A corrective action was removed.
    ComplianceActionDeleted,
    /// Evidence was attached to a compliance item.
    ComplianceEvidenceAdded,
    /// Evidence was removed from a compliance item.
    ComplianceEvidenceDeleted,
    /// An audit was scheduled.
    AuditCreated,
    /// An audit changed.
    AuditUpdated,
    /// An audit was deleted.
    AuditDeleted,
    /// A training record was created.
    TrainingCreated,
    /// A training record changed.
    TrainingUpdated,
    /// A training record was deleted.
    TrainingDeleted,
    /// A training was completed.
    TrainingCompleted,
}

impl ActivityType {
    /// Every activity type, in taxonomy order.
    pub const ALL: [Self; 32] = [
        Self::TaskCreated,
        Self::TaskUpdated,
        Self::TaskDeleted,
        Self::AssigneeAdded,
        Self::AssigneeRemoved,
        Self::SubtaskCreated,
        Self::SubtaskUpdated,
        Self::SubtaskCompleted,
        Self::SubtaskDeleted,
        Self::CommentAdded,
        Self::CommentUpdated,
        Self::CommentDeleted,
        Self::FileUploaded,
        Self::FileDeleted,
        Self::ProjectCreated,
        Self::ProjectUpdated,
        Self::ProjectDeleted,
        Self::ComplianceItemCreated,
        Self::ComplianceItemUpdated,
        Self::ComplianceItemDeleted,
        Self::ComplianceActionAdded,
        Self::ComplianceActionUpdated,
        Self::ComplianceActionDeleted,
        Self::ComplianceEvidenceAdded,
        Self::ComplianceEvidenceDeleted,
        Self::AuditCreated,
        Self::AuditUpdated,
        Self::AuditDeleted,
        Self::TrainingCreated,
        Self::TrainingUpdated,
        Self::TrainingDeleted,
        Self::TrainingCompleted,
    ];

    /// Returns the stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskUpdated => "task_updated",
            Self::TaskDeleted => "task_deleted",
            Self::AssigneeAdded => "assignee_added",
            Self::AssigneeRemoved => "assignee_removed",
            Self::SubtaskCreated => "subtask_created",
            Self::SubtaskUpdated => "subtask_updated",
            Self::SubtaskCompleted => "subtask_completed",
            Self::SubtaskDeleted => "subtask_deleted",
            Self::CommentAdded => "comment_added",
            Self::CommentUpdated => "comment_updated",
            Self::CommentDeleted => "comment_deleted",
            Self::FileUploaded => "file_uploaded",
            Self::FileDeleted => "file_deleted",
            Self::ProjectCreated => "project_created",
            Self::ProjectUpdated => "project_updated",
            Self::ProjectDeleted => "project_deleted",
            Self::ComplianceItemCreated => "compliance_item_created",
            Self::ComplianceItemUpdated => "compliance_item_updated",
            Self::ComplianceItemDeleted => "compliance_item_deleted",
            Self::ComplianceActionAdded => "compliance_action_added",
            Self::ComplianceActionUpdated => "compliance_action_updated",
            Self::ComplianceActionDeleted => "compliance_action_deleted",
            Self::ComplianceEvidenceAdded => "compliance_evidence_added",
            Self::ComplianceEvidenceDeleted => "compliance_evidence_deleted",
            Self::AuditCreated => "audit_created",
            Self::AuditUpdated => "audit_updated",
            Self::AuditDeleted => "audit_deleted",
            Self::TrainingCreated => "training_created",
            Self::TrainingUpdated => "training_updated",
            Self::TrainingDeleted => "training_deleted",
            Self::TrainingCompleted => "training_completed",
        }
    }

    /// Returns the operation name stored in event metadata.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::TaskCreated
            | Self::SubtaskCreated
            | Self::ProjectCreated
            | Self::ComplianceItemCreated
            | Self::AuditCreated
            | Self::TrainingCreated => "create",
            Self::TaskUpdated
            | Self::SubtaskUpdated
            | Self::CommentUpdated
            | Self::ProjectUpdated
            | Self::ComplianceItemUpdated
            | Self::ComplianceActionUpdated
            | Self::AuditUpdated
            | Self::TrainingUpdated => "update",
            Self::TaskDeleted
            | Self::SubtaskDeleted
            | Self::CommentDeleted
            | Self::FileDeleted
            | Self::ProjectDeleted
            | Self::ComplianceItemDeleted
            | Self::ComplianceActionDeleted
            | Self::ComplianceEvidenceDeleted
            | Self::AuditDeleted
            | Self::TrainingDeleted => "delete",
            Self::AssigneeAdded
            | Self::CommentAdded
            | Self::ComplianceActionAdded
            | Self::ComplianceEvidenceAdded => "add",
            Self::AssigneeRemoved => "remove",
            Self::SubtaskCompleted | Self::TrainingCompleted => "complete",
            Self::FileUploaded => "upload",
        }
    }

    /// Returns the kind of entity whose activity log receives the event.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::TaskCreated
            | Self::TaskUpdated
            | Self::TaskDeleted
            | Self::AssigneeAdded
            | Self::AssigneeRemoved
            | Self::SubtaskCreated
            | Self::SubtaskUpdated
            | Self::SubtaskCompleted
            | Self::SubtaskDeleted
            | Self::CommentAdded
            | Self::CommentUpdated
            | Self::CommentDeleted
            | Self::FileUploaded
            | Self::FileDeleted => EntityKind::Task,
            Self::ProjectCreated | Self::ProjectUpdated | Self::ProjectDeleted => {
                EntityKind::Project
            }
            Self::ComplianceItemCreated
            | Self::ComplianceItemUpdated
            | Self::ComplianceItemDeleted
            | Self::ComplianceActionAdded
            | Self::ComplianceActionUpdated
            | Self::ComplianceActionDeleted
            | Self::ComplianceEvidenceAdded
            | Self::ComplianceEvidenceDeleted => EntityKind::ComplianceItem,
            Self::AuditCreated | Self::AuditUpdated | Self::AuditDeleted => EntityKind::Audit,
            Self::TrainingCreated
            | Self::TrainingUpdated
            | Self::TrainingDeleted
            | Self::TrainingCompleted => EntityKind::Training,
        }
    }
}

impl TryFrom<&str> for ActivityType {
    type Error = AuditDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| AuditDomainError::UnknownActivityType(value.to_owned()))
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of record an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A task.
    Task,
    /// A project.
    Project,
    /// A compliance item.
    ComplianceItem,
    /// A scheduled audit.
    Audit,
    /// A training record.
    Training,
}

impl EntityKind {
    /// Returns the stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::ComplianceItem => "compliance_item",
            Self::Audit => "audit",
            Self::Training => "training",
        }
    }
}

impl TryFrom<&str> for EntityKind {
    type Error = AuditDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "task" => Ok(Self::Task),
            "project" => Ok(Self::Project),
            "compliance_item" => Ok(Self::ComplianceItem),
            "audit" => Ok(Self::Audit),
            "training" => Ok(Self::Training),
            other => Err(AuditDomainError::UnknownEntityKind(other.to_owned())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the entity owning an activity log.
///
/// Identifiers are kept as strings so that records managed outside this
/// crate (compliance items, audits, trainings) can be referenced too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    /// Entity kind.
    pub kind: EntityKind,
    /// Entity identifier.
    pub id: String,
}

impl EntityRef {
    /// Creates a reference from a kind and identifier.
    #[must_use]
    pub fn new(kind: EntityKind, id: impl ToString) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Entity an event is about, with the title shown in descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSubject {
    /// Entity reference.
    pub entity: EntityRef,
    /// Display title at the time of the event.
    pub title: String,
}

impl AuditSubject {
    /// Creates a subject.
    #[must_use]
    pub fn new(entity: EntityRef, title: impl Into<String>) -> Self {
        Self {
            entity,
            title: title.into(),
        }
    }
}
