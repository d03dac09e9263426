//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::{BackendError, RestTaskClient, TaskBackend};
use crate::config::Config;
use crate::document::{Document, DocumentError};
use crate::extraction::{ExtractionError, TaskExtractor};
use crate::llm::OpenRouterClient;
use crate::reconcile::{rank_matches, BatchSummary, ReconcileError, Reconciler};

use super::types::*;

/// Default number of entries returned by the similar-tasks endpoint.
const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// Shared application state.
pub struct AppState {
    pub extractor: TaskExtractor,
    pub backend: Arc<dyn TaskBackend>,
    pub reconciler: Reconciler,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = Arc::new(OpenRouterClient::new(config.openrouter_api_key.clone()));
    let backend: Arc<dyn TaskBackend> = Arc::new(RestTaskClient::new(
        &config.backend_url,
        config.backend_api_key.clone(),
    ));

    let state = Arc::new(AppState {
        extractor: TaskExtractor::new(llm, config.extraction_model.clone()),
        backend: Arc::clone(&backend),
        reconciler: Reconciler::new(backend),
    });

    // Upload body limit: document cap plus multipart framing overhead.
    let upload_route = Router::new()
        .route("/api/upload", post(upload))
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/process-text", post(process_text))
        .route("/api/tasks/similar", post(similar_tasks))
        .merge(upload_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Errors a handler can surface, mapped onto HTTP statuses.
enum ApiError {
    Document(DocumentError),
    Extraction(ExtractionError),
    Backend(BackendError),
    Reconcile(ReconcileError),
    BadRequest(String),
}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        Self::Document(e)
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        Self::Extraction(e)
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

impl From<ReconcileError> for ApiError {
    fn from(e: ReconcileError) -> Self {
        Self::Reconcile(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Document(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Extraction(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ApiError::Backend(e) => (backend_status(&e), e.to_string()),
            ApiError::Reconcile(e) => match e {
                ReconcileError::Busy => (StatusCode::CONFLICT, e.to_string()),
                ReconcileError::CorpusFetch(inner) => {
                    (backend_status(&inner), inner.to_string())
                }
            },
        };
        tracing::warn!(%status, "request failed: {}", message);
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn backend_status(error: &BackendError) -> StatusCode {
    match error {
        BackendError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        BackendError::NotFound(_) => StatusCode::NOT_FOUND,
        BackendError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// POST /api/process-text
async fn process_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessTextRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let document = Document::from_text(&req.text, req.name)?;
    process_document(&state, document).await
}

/// POST /api/upload (multipart, field name `file`)
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("file field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
        let document = Document::from_upload(&file_name, &bytes)?;
        return process_document(&state, document).await;
    }
    Err(ApiError::BadRequest(
        "multipart body has no 'file' field".to_string(),
    ))
}

/// POST /api/tasks/similar - diagnostic ranked-match search, independent of
/// the create/update flow.
async fn similar_tasks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimilarTasksRequest>,
) -> Result<Json<SimilarTasksResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text cannot be empty".to_string()));
    }
    let corpus = state.backend.list_tasks().await?;
    let mut matches = rank_matches(&req.text, &corpus);
    matches.truncate(req.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT));
    Ok(Json(SimilarTasksResponse { matches }))
}

/// Extraction followed by a reconciliation batch, shared by both ingestion
/// endpoints.
async fn process_document(
    state: &AppState,
    document: Document,
) -> Result<Json<ProcessResponse>, ApiError> {
    tracing::info!(name = %document.name, source = ?document.source, "processing document");
    let candidates = state
        .extractor
        .extract(&document.content, &document.name)
        .await?;
    let outcomes = state.reconciler.reconcile_batch(candidates).await?;
    let summary = BatchSummary::tally(&outcomes);
    Ok(Json(ProcessResponse {
        document: DocumentInfo::from(&document),
        tasks: outcomes,
        summary,
    }))
}
