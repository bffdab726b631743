//! Labtrack: research and lab operations tracker core.
//!
//! This crate provides the engineering core behind the tracker's projects,
//! tasks, compliance items, audits and training records: human-readable task
//! code allocation, the task summaries cached inside project records, and the
//! audit trail written for every tracked mutation.
//!
//! # Architecture
//!
//! Labtrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`project`]: Projects and their embedded task summaries
//! - [`task`]: Task code allocation, task lifecycle and summary synchronization
//! - [`audit`]: Audit events, the global log and entity-scoped activity logs
//! - [`api`]: Framework-agnostic request handlers
//! - [`config`]: Runtime configuration

pub mod api;
pub mod audit;
pub mod config;
pub mod project;
pub mod task;
