//! Mapping from service errors to responses.

use super::{ApiResponse, ResponseStatus};
use crate::audit::services::AuditError;
use crate::project::services::ProjectLifecycleError;
use crate::task::services::{SyncError, TaskLifecycleError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// Handler-level error carrying its response status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    Validation(String),
    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// No task code could be allocated.
    #[error("{0}")]
    AllocationExhausted(String),
    /// Any other failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the response status for this error.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Validation(_) | Self::AllocationExhausted(_) => ResponseStatus::BAD_REQUEST,
            Self::NotFound(_) => ResponseStatus::NOT_FOUND,
            Self::Internal(_) => ResponseStatus::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into an `{"error": message}` response.
    #[must_use]
    pub fn into_response(self) -> ApiResponse {
        ApiResponse::error(self.status(), &self.to_string())
    }

    fn internal(err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::Internal(err.to_string())
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(_) => Self::Validation(err.to_string()),
            TaskLifecycleError::ProjectNotFound(_) | TaskLifecycleError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            TaskLifecycleError::AllocationExhausted { .. } => {
                Self::AllocationExhausted(err.to_string())
            }
            TaskLifecycleError::Repository(_) | TaskLifecycleError::Project(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<ProjectLifecycleError> for ApiError {
    fn from(err: ProjectLifecycleError) -> Self {
        match err {
            ProjectLifecycleError::Domain(_) => Self::Validation(err.to_string()),
            ProjectLifecycleError::NotFound(_) => Self::NotFound(err.to_string()),
            ProjectLifecycleError::Repository(_) => Self::internal(&err),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self::internal(&err)
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        Self::internal(&err)
    }
}

/// Deserializes a JSON body into a request type.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone())
        .map_err(|err| ApiError::Validation(format!("invalid request body: {err}")))
}

/// Parses a path identifier.
pub(crate) fn parse_id<I>(raw: &str) -> Result<I, ApiError>
where
    I: FromStr,
    I::Err: std::fmt::Display,
{
    raw.parse::<I>()
        .map_err(|err| ApiError::Validation(err.to_string()))
}
