//! REST client for the task-tracking backend.

use reqwest::{Client, StatusCode};

use crate::task::{ExistingTask, NewTask, TaskPatch};

use super::{BackendError, TaskBackend};

/// REST client for a task tracker exposing `/tasks` collection endpoints.
pub struct RestTaskClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestTaskClient {
    /// Create a new client. The API key, when present, is sent as a bearer
    /// token on every request.
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }

    async fn parse_task_response(
        resp: reqwest::Response,
        id_for_not_found: Option<&str>,
    ) -> Result<ExistingTask, BackendError> {
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, id_for_not_found));
        }

        serde_json::from_str(&text).map_err(|e| {
            BackendError::Unavailable(format!("malformed task in response: {} - {}", e, text))
        })
    }
}

/// Map an unsuccessful HTTP status to the backend error taxonomy.
fn error_for_status(
    status: StatusCode,
    body: &str,
    id_for_not_found: Option<&str>,
) -> BackendError {
    match status {
        StatusCode::NOT_FOUND => {
            BackendError::NotFound(id_for_not_found.unwrap_or(body).to_string())
        }
        s if s.is_client_error() => {
            BackendError::Validation(format!("{} - {}", status, body))
        }
        _ => BackendError::Unavailable(format!("{} - {}", status, body)),
    }
}

#[async_trait::async_trait]
impl TaskBackend for RestTaskClient {
    async fn list_tasks(&self) -> Result<Vec<ExistingTask>, BackendError> {
        let resp = self
            .authorize(self.client.get(self.tasks_url()))
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, None));
        }

        serde_json::from_str(&text).map_err(|e| {
            BackendError::Unavailable(format!("malformed task list: {} - {}", e, text))
        })
    }

    async fn create_task(&self, fields: NewTask) -> Result<ExistingTask, BackendError> {
        tracing::debug!(title = %fields.title, "creating task");
        let resp = self
            .authorize(self.client.post(self.tasks_url()))
            .json(&fields)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Self::parse_task_response(resp, None).await
    }

    async fn update_task(
        &self,
        id: &str,
        patch: TaskPatch,
    ) -> Result<ExistingTask, BackendError> {
        tracing::debug!(%id, "updating task");
        let resp = self
            .authorize(
                self.client
                    .patch(format!("{}/{}", self.tasks_url(), id)),
            )
            .json(&patch)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Self::parse_task_response(resp, Some(id)).await
    }
}
