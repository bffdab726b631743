//! Adapter implementations for audit persistence.

pub mod memory;
pub mod postgres;
