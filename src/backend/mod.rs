//! Task-backend client module.
//!
//! The reconciliation engine talks to the external task tracker through the
//! [`TaskBackend`] trait so the orchestrator can be exercised against an
//! in-memory double in tests. The production implementation is a REST
//! client.

mod rest;

pub use rest::RestTaskClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::task::{ExistingTask, NewTask, TaskPatch};

/// Errors surfaced by the task backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connectivity or auth failure, or a 5xx from the backend.
    #[error("task backend unavailable: {0}")]
    Unavailable(String),
    /// The task id no longer exists.
    #[error("task not found: {0}")]
    NotFound(String),
    /// The backend rejected the field values.
    #[error("task rejected by backend: {0}")]
    Validation(String),
}

/// Client for the external task tracker.
///
/// The engine never deletes tasks; listing, creating and patching are the
/// whole surface.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Fetch the full task corpus, in the backend's stable listing order.
    async fn list_tasks(&self) -> Result<Vec<ExistingTask>, BackendError>;

    /// Create a task and return the stored record.
    async fn create_task(&self, fields: NewTask) -> Result<ExistingTask, BackendError>;

    /// Patch a task and return the updated record.
    async fn update_task(&self, id: &str, patch: TaskPatch)
        -> Result<ExistingTask, BackendError>;
}
