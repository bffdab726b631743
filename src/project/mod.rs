//! Project records and their embedded task summaries.
//!
//! A project owns the task code prefix derived from its name, the per-prefix
//! high-water marks of issued task numbers, and a denormalized list of task
//! summaries used by list views. The summary list is a cache; the task
//! records remain authoritative. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
