//! Audit trail for tracked mutations.
//!
//! Every successful state-changing operation on a task, project, compliance
//! item, audit or training record produces one [`domain::AuditEvent`]. The
//! event is written twice: once to the global log, which backs the activity
//! feed, and once as an [`domain::ActivityEntry`] in the subject entity's own
//! activity log. Recording is best-effort: failures are logged and never
//! change the outcome of the request that triggered them.
//!
//! Two entry points feed the pipeline:
//!
//! - [`services::DirectAuditor`] for handlers that audit explicitly after
//!   their mutation succeeds.
//! - [`services::TaskAuditInterceptor`] for task-scoped handlers, which wraps
//!   the handler and derives events from its request, response and the prior
//!   task state.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
