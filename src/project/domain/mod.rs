//! Domain model for projects.
//!
//! Projects carry the task summary cache and the prefix used to namespace
//! task codes. Infrastructure concerns stay outside the domain boundary.

mod error;
mod ids;
mod prefix;
mod project;
mod summary;

pub use error::ProjectDomainError;
pub use ids::{ProjectId, ProjectName};
pub use prefix::TaskCodePrefix;
pub use project::{PersistedProjectData, Project};
pub use summary::TaskSummary;
