//! Application services for project orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateProjectRequest, ProjectLifecycleError, ProjectLifecycleResult, ProjectLifecycleService,
    ProjectUpdate, UpdateProjectRequest,
};
