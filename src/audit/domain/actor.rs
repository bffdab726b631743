//! Acting users recorded on audit events.

use crate::config::AuditConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body key carrying a fallback actor identifier.
pub const BODY_USER_ID: &str = "userId";
/// Body key carrying a fallback actor display name.
pub const BODY_USER_NAME: &str = "userName";
/// Header carrying a fallback actor identifier.
pub const HEADER_USER_ID: &str = "x-user-id";
/// Header carrying a fallback actor display name.
pub const HEADER_USER_NAME: &str = "x-user-name";

/// Authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// User recorded as the author of an audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier.
    pub id: String,
    /// Display name interpolated into descriptions.
    pub name: String,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the configured anonymous actor.
    #[must_use]
    pub fn anonymous(config: &AuditConfig) -> Self {
        Self::new(&config.anonymous_actor_id, &config.anonymous_actor_name)
    }

    /// Resolves the actor for a direct-invocation audit.
    ///
    /// The authenticated principal wins. Without one, each of the identifier
    /// and the display name falls back independently to the request body
    /// (`userId` / `userName`), then to the `x-user-id` / `x-user-name`
    /// headers, then to the configured anonymous identity. Header names are
    /// matched case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use labtrack::audit::domain::Actor;
    /// use labtrack::config::AuditConfig;
    /// use serde_json::json;
    /// use std::collections::BTreeMap;
    ///
    /// let headers = BTreeMap::from([("x-user-name".to_owned(), "Ada".to_owned())]);
    /// let body = json!({ "userId": "u-7" });
    /// let actor = Actor::resolve(None, &body, &headers, &AuditConfig::default());
    /// assert_eq!(actor.id, "u-7");
    /// assert_eq!(actor.name, "Ada");
    /// ```
    #[must_use]
    pub fn resolve(
        principal: Option<&Principal>,
        body: &Value,
        headers: &BTreeMap<String, String>,
        config: &AuditConfig,
    ) -> Self {
        if let Some(user) = principal {
            return Self::new(&user.id, &user.name);
        }

        let id = body_text(body, BODY_USER_ID)
            .or_else(|| header_text(headers, HEADER_USER_ID))
            .unwrap_or(&config.anonymous_actor_id);
        let name = body_text(body, BODY_USER_NAME)
            .or_else(|| header_text(headers, HEADER_USER_NAME))
            .unwrap_or(&config.anonymous_actor_name);
        Self::new(id, name)
    }
}

impl From<&Principal> for Actor {
    fn from(principal: &Principal) -> Self {
        Self::new(&principal.id, &principal.name)
    }
}

fn body_text<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn header_text<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
        .filter(|text| !text.is_empty())
}
