//! Task lifecycle management.
//!
//! Tasks scoped to a project receive a sequential code built from the
//! project's prefix (`LMS-1`, `LMS-2`, ...) and are mirrored into the
//! project's embedded summary list after every write. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
