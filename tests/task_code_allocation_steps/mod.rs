//! Step definitions for task code allocation scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
