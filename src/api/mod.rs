//! Framework-agnostic request handlers.
//!
//! Handlers take a [`RequestContext`] and a JSON body, call one service
//! operation and return an [`ApiResponse`]. Binding them to an HTTP
//! framework is left to the embedding application.

mod audit;
mod error;
mod projects;
mod response;
mod tasks;

pub use audit::AuditHandlers;
pub use error::ApiError;
pub use projects::ProjectHandlers;
pub use response::{ApiResponse, RequestContext, ResponseStatus};
pub use tasks::TaskHandlers;
