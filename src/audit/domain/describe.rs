//! Human-readable descriptions for audit events.
//!
//! Descriptions are `minijinja` templates rendered against a context holding
//! the actor's display name (`actor`), the subject title (`title`) and every
//! key of the event details. Field changes additionally expose `field`,
//! `old_value` and `new_value` as display strings.

use super::{ActivityType, AuditDomainError};
use minijinja::Environment;
use serde_json::{Map, Value};

/// Field names stored in field-change details.
pub const DETAIL_FIELD: &str = "field";
/// Previous value stored in field-change details.
pub const DETAIL_OLD_VALUE: &str = "oldValue";
/// New value stored in field-change details.
pub const DETAIL_NEW_VALUE: &str = "newValue";

/// Returns the description template for an activity type.
///
/// [`ActivityType::TaskUpdated`] events that carry a `field` detail are
/// described by [`field_template`] instead.
#[must_use]
pub const fn activity_template(activity_type: ActivityType) -> &'static str {
    match activity_type {
        ActivityType::TaskCreated => {
            r#"{{ actor }} created task "{{ title }}"{% if customId %} ({{ customId }}){% endif %}"#
        }
        ActivityType::TaskUpdated => r#"{{ actor }} updated task "{{ title }}""#,
        ActivityType::TaskDeleted => r#"{{ actor }} deleted task "{{ title }}""#,
        ActivityType::AssigneeAdded => r#"{{ actor }} assigned {{ assignee }} to "{{ title }}""#,
        ActivityType::AssigneeRemoved => {
            r#"{{ actor }} removed {{ assignee }} from "{{ title }}""#
        }
        ActivityType::SubtaskCreated => {
            r#"{{ actor }} added subtask "{{ subtaskTitle }}" to "{{ title }}""#
        }
        ActivityType::SubtaskUpdated => {
            r#"{{ actor }} updated subtask "{{ subtaskTitle }}" on "{{ title }}""#
        }
        ActivityType::SubtaskCompleted => {
            r#"{{ actor }} completed subtask "{{ subtaskTitle }}" on "{{ title }}""#
        }
        ActivityType::SubtaskDeleted => {
            r#"{{ actor }} deleted subtask "{{ subtaskTitle }}" from "{{ title }}""#
        }
        ActivityType::CommentAdded => r#"{{ actor }} commented on "{{ title }}""#,
        ActivityType::CommentUpdated => r#"{{ actor }} edited a comment on "{{ title }}""#,
        ActivityType::CommentDeleted => r#"{{ actor }} deleted a comment from "{{ title }}""#,
        ActivityType::FileUploaded => r#"{{ actor }} uploaded {{ fileName }} to "{{ title }}""#,
        ActivityType::FileDeleted => r#"{{ actor }} removed {{ fileName }} from "{{ title }}""#,
        ActivityType::ProjectCreated => r#"{{ actor }} created project "{{ title }}""#,
        ActivityType::ProjectUpdated => r#"{{ actor }} updated project "{{ title }}""#,
        ActivityType::ProjectDeleted => r#"{{ actor }} deleted project "{{ title }}""#,
        ActivityType::ComplianceItemCreated => {
            r#"{{ actor }} created compliance item "{{ title }}""#
        }
        ActivityType::ComplianceItemUpdated => {
            r#"{{ actor }} updated compliance item "{{ title }}""#
        }
        ActivityType::ComplianceItemDeleted => {
            r#"{{ actor }} deleted compliance item "{{ title }}""#
        }
        ActivityType::ComplianceActionAdded => {
            r#"{{ actor }} added a corrective action to "{{ title }}""#
        }
        ActivityType::ComplianceActionUpdated => {
            r#"{{ actor }} updated a corrective action on "{{ title }}""#
        }
        ActivityType::ComplianceActionDeleted => {
            r#"{{ actor }} removed a corrective action from "{{ title }}""#
        }
        ActivityType::ComplianceEvidenceAdded => {
            r#"{{ actor }} attached evidence {{ fileName }} to "{{ title }}""#
        }
        ActivityType::ComplianceEvidenceDeleted => {
            r#"{{ actor }} removed evidence {{ fileName }} from "{{ title }}""#
        }
        ActivityType::AuditCreated => r#"{{ actor }} scheduled audit "{{ title }}""#,
        ActivityType::AuditUpdated => r#"{{ actor }} updated audit "{{ title }}""#,
        ActivityType::AuditDeleted => r#"{{ actor }} deleted audit "{{ title }}""#,
        ActivityType::TrainingCreated => r#"{{ actor }} created training "{{ title }}""#,
        ActivityType::TrainingUpdated => r#"{{ actor }} updated training "{{ title }}""#,
        ActivityType::TrainingDeleted => r#"{{ actor }} deleted training "{{ title }}""#,
        ActivityType::TrainingCompleted => r#"{{ actor }} completed training "{{ title }}""#,
    }
}

/// Returns the description template for a change to one task field.
///
/// # Examples
///
/// ```
/// use labtrack::audit::domain::field_template;
///
/// assert!(field_template("status").contains("status"));
/// assert_eq!(field_template("labels"), "{{ field }} was updated");
/// ```
#[must_use]
pub fn field_template(field: &str) -> &'static str {
    match field {
        "status" => {
            r#"{{ actor }} changed the status of "{{ title }}" from {{ old_value }} to {{ new_value }}"#
        }
        "priority" => {
            r#"{{ actor }} changed the priority of "{{ title }}" from {{ old_value }} to {{ new_value }}"#
        }
        "assignee" => {
            r#"{{ actor }} changed the assignee of "{{ title }}" from {{ old_value }} to {{ new_value }}"#
        }
        "dueDate" => {
            r#"{{ actor }} changed the due date of "{{ title }}" from {{ old_value }} to {{ new_value }}"#
        }
        "title" => r#"{{ actor }} renamed "{{ old_value }}" to "{{ new_value }}""#,
        "description" => r#"{{ actor }} updated the description of "{{ title }}""#,
        _ => "{{ field }} was updated",
    }
}

/// Renders the description of an event.
///
/// # Errors
///
/// Returns [`AuditDomainError::Template`] when rendering fails.
pub fn describe(
    activity_type: ActivityType,
    actor_name: &str,
    title: &str,
    details: &Map<String, Value>,
) -> Result<String, AuditDomainError> {
    let mut context = details.clone();
    context.insert("actor".to_owned(), Value::String(actor_name.to_owned()));
    context.insert("title".to_owned(), Value::String(title.to_owned()));

    let field = details.get(DETAIL_FIELD).and_then(Value::as_str);
    let template = match (activity_type, field) {
        (ActivityType::TaskUpdated, Some(name)) => {
            context.insert(
                "old_value".to_owned(),
                Value::String(display_value(details.get(DETAIL_OLD_VALUE))),
            );
            context.insert(
                "new_value".to_owned(),
                Value::String(display_value(details.get(DETAIL_NEW_VALUE))),
            );
            field_template(name)
        }
        _ => activity_template(activity_type),
    };

    Environment::new()
        .render_str(template, context)
        .map_err(|error| AuditDomainError::Template {
            activity_type: activity_type.to_string(),
            reason: error.to_string(),
        })
}

/// Formats a detail value for display in a description.
///
/// Strings render without quotes and missing or `null` values render as
/// `none`.
#[must_use]
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "none".to_owned(),
        Some(Value::String(text)) if text.is_empty() => "none".to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
