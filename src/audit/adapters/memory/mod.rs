//! In-memory adapters for audit persistence.

mod activity;
mod log;

pub use activity::InMemoryEntityActivity;
pub use log::InMemoryAuditLog;
