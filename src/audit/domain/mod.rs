//! Domain model for the audit trail.

mod actor;
mod changes;
mod describe;
mod error;
mod event;
mod ids;
mod kind;
mod upload;

pub use actor::{
    Actor, BODY_USER_ID, BODY_USER_NAME, HEADER_USER_ID, HEADER_USER_NAME, Principal,
};
pub use changes::{FieldChange, detect_changes};
pub use describe::{activity_template, describe, display_value, field_template};
pub use error::AuditDomainError;
pub use event::{ActivityEntry, AuditEvent, AuditEventDraft, AuditMeta};
pub use ids::ActivityId;
pub use kind::{ActivityType, AuditSubject, EntityKind, EntityRef};
pub use upload::UploadedFile;
