//! Domain model for tasks.
//!
//! Tasks are the authoritative records behind project summaries. Scoped
//! tasks carry a human-readable [`TaskCode`] allocated from their project's
//! prefix.

mod error;
mod fields;
mod ids;
mod patch;
mod task;

pub use error::{ParseTaskFieldError, TaskDomainError};
pub use fields::{Progress, TaskPriority, TaskStatus};
pub use ids::{TaskCode, TaskId};
pub use patch::TaskPatch;
pub use task::{NewTask, PersistedTaskData, Task};
