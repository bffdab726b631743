//! Adapter implementations for the project repository port.

pub mod memory;
pub mod postgres;
