//! Framework-agnostic request context and response values.

use crate::audit::domain::Principal;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP-equivalent response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponseStatus(u16);

impl ResponseStatus {
    /// `200 OK`.
    pub const OK: Self = Self(200);
    /// `201 Created`.
    pub const CREATED: Self = Self(201);
    /// `400 Bad Request`.
    pub const BAD_REQUEST: Self = Self(400);
    /// `404 Not Found`.
    pub const NOT_FOUND: Self = Self(404);
    /// `500 Internal Server Error`.
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Creates a status from its numeric code.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response produced by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Response status.
    pub status: ResponseStatus,
    /// JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: ResponseStatus, body: Value) -> Self {
        Self { status, body }
    }

    /// Serializes a value into a response with the given status.
    ///
    /// A value that fails to serialize yields a 500 response.
    #[must_use]
    pub fn json(status: ResponseStatus, value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::new(status, body),
            Err(err) => Self::error(ResponseStatus::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }

    /// Serializes a value into a 200 response.
    #[must_use]
    pub fn ok(value: &impl Serialize) -> Self {
        Self::json(ResponseStatus::OK, value)
    }

    /// Serializes a value into a 201 response.
    #[must_use]
    pub fn created(value: &impl Serialize) -> Self {
        Self::json(ResponseStatus::CREATED, value)
    }

    /// Creates an error response with an `error` message body.
    #[must_use]
    pub fn error(status: ResponseStatus, message: &str) -> Self {
        Self::new(status, json!({ "error": message }))
    }

    /// Returns `true` for 2xx responses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Per-request information available to handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    principal: Option<Principal>,
    headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// Creates a context without a principal or headers.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a context for an authenticated principal.
    #[must_use]
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            headers: BTreeMap::new(),
        }
    }

    /// Adds a header; names are stored lower-cased.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the authenticated principal, if any.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}
