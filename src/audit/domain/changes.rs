//! Field-change detection for update requests.

use super::actor::{BODY_USER_ID, BODY_USER_NAME};
use serde::Serialize;
use serde_json::Value;

/// One field whose requested value differs from the prior state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Body key that changed.
    pub field: String,
    /// Value before the update, `null` when absent.
    pub old_value: Value,
    /// Requested value.
    pub new_value: Value,
}

/// Compares an update body against the prior entity state.
///
/// Every key of `update` except the actor fallback keys is compared with
/// the same key of `prior`; a missing prior key compares as `null`. Keys
/// whose values are equal produce nothing. Non-object bodies produce no
/// changes.
///
/// # Examples
///
/// ```
/// use labtrack::audit::domain::detect_changes;
/// use serde_json::json;
///
/// let prior = json!({ "status": "todo", "priority": "low", "title": "Calibrate" });
/// let update = json!({ "status": "done", "priority": "low", "userId": "u-1" });
/// let changes = detect_changes(&prior, &update);
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes[0].field, "status");
/// assert_eq!(changes[0].old_value, json!("todo"));
/// ```
#[must_use]
pub fn detect_changes(prior: &Value, update: &Value) -> Vec<FieldChange> {
    let Some(requested) = update.as_object() else {
        return Vec::new();
    };

    requested
        .iter()
        .filter(|(key, _)| !is_actor_key(key))
        .filter_map(|(key, new_value)| {
            let old_value = prior.get(key).cloned().unwrap_or(Value::Null);
            (old_value != *new_value).then(|| FieldChange {
                field: key.clone(),
                old_value,
                new_value: new_value.clone(),
            })
        })
        .collect()
}

fn is_actor_key(key: &str) -> bool {
    key == BODY_USER_ID || key == BODY_USER_NAME
}
