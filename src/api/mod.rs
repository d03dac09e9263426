//! HTTP API for document processing and task search.

pub mod routes;
pub mod types;

pub use routes::{serve, AppState};
