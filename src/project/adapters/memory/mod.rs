//! In-memory project adapters for tests and embedded use.

mod project;

pub use project::InMemoryProjectRepository;
