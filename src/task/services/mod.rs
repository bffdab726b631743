//! Application services for task code allocation, lifecycle and summary
//! synchronization.

mod allocator;
mod lifecycle;
mod sync;

pub use allocator::{AllocationError, AllocationResult, TaskCodeAllocator};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TaskUpdate,
};
pub use sync::{ProjectSummarySync, ReconcileReport, SyncError, SyncResult};
