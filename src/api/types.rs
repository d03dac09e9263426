//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{Document, DocumentSource};
use crate::reconcile::{BatchSummary, RankedMatch, ReconciliationOutcome};

/// Body of `POST /api/process-text`.
#[derive(Debug, Deserialize)]
pub struct ProcessTextRequest {
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Document metadata echoed back to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: Uuid,
    pub name: String,
    pub source: DocumentSource,
}

impl From<&Document> for DocumentInfo {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            source: doc.source,
        }
    }
}

/// Response of the processing endpoints: one outcome per extracted task
/// plus aggregate counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub document: DocumentInfo,
    pub tasks: Vec<ReconciliationOutcome>,
    pub summary: BatchSummary,
}

/// Body of `POST /api/tasks/similar`.
#[derive(Debug, Deserialize)]
pub struct SimilarTasksRequest {
    pub text: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response of `POST /api/tasks/similar`.
#[derive(Debug, Serialize)]
pub struct SimilarTasksResponse {
    pub matches: Vec<RankedMatch>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Error body returned for any failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
