//! Error types for audit domain values.

use thiserror::Error;

/// Errors returned while building or parsing audit domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditDomainError {
    /// The activity identifier is not a valid UUID.
    #[error("invalid activity identifier '{0}'")]
    InvalidActivityId(String),

    /// The activity type tag is not recognised.
    #[error("unknown activity type '{0}'")]
    UnknownActivityType(String),

    /// The entity kind tag is not recognised.
    #[error("unknown entity kind '{0}'")]
    UnknownEntityKind(String),

    /// The description template failed to render.
    #[error("failed to render description for {activity_type}: {reason}")]
    Template {
        /// Activity type being described.
        activity_type: String,
        /// Renderer failure.
        reason: String,
    },
}
