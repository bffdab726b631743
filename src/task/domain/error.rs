//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The progress value is outside `0..=100`.
    #[error("invalid progress {0}, expected a percentage between 0 and 100")]
    InvalidProgress(u64),

    /// The task code does not follow `<PREFIX>-<N>` format.
    #[error("invalid task code '{0}', expected <PREFIX>-<N>")]
    InvalidTaskCode(String),

    /// The task identifier is not a valid UUID.
    #[error("invalid task identifier '{0}'")]
    InvalidTaskId(String),
}

/// Error returned while parsing task status or priority values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {field}: {value}")]
pub struct ParseTaskFieldError {
    /// Name of the field being parsed.
    pub field: &'static str,
    /// The rejected value.
    pub value: String,
}
