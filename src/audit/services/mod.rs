//! Application services for recording and reading the audit trail.

mod direct;
mod interceptor;
mod recorder;

pub use direct::DirectAuditor;
pub use interceptor::{TaskAuditInterceptor, TaskOperation};
pub use recorder::{AuditError, AuditRecorder, AuditResult};
