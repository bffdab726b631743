//! Port definitions for audit persistence.

mod repository;

pub use repository::{
    AuditLogRepository, AuditQuery, AuditRepositoryError, AuditRepositoryResult,
    EntityActivityRepository,
};
