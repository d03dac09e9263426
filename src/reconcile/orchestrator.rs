//! Batch orchestration of the reconciliation pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::backend::{BackendError, TaskBackend};
use crate::task::{CandidateTask, ExistingTask};

use super::keywords::extract_keywords;
use super::matcher::select_best_match;
use super::planner::{plan_operation, Operation};

/// What happened to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeAction {
    Created,
    Updated,
    Error,
}

/// Per-candidate result of a reconciliation batch.
///
/// Every candidate produces exactly one outcome, in input order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub action: OutcomeAction,
    pub candidate: CandidateTask,
    /// The created or updated backend record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resulting_task: Option<ExistingTask>,
    /// Present only for updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    /// Present only for errors; backend message preserved verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconciliationOutcome {
    fn error(candidate: CandidateTask, message: String) -> Self {
        Self {
            action: OutcomeAction::Error,
            candidate,
            resulting_task: None,
            similarity: None,
            error: Some(message),
        }
    }
}

/// Aggregate counts over a batch, for caller-facing reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
}

impl BatchSummary {
    /// Tally the outcomes of one batch.
    pub fn tally(outcomes: &[ReconciliationOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.action {
                OutcomeAction::Created => summary.created += 1,
                OutcomeAction::Updated => summary.updated += 1,
                OutcomeAction::Error => summary.errors += 1,
            }
        }
        summary
    }
}

/// Failures that abort a whole batch, as opposed to per-candidate errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Another batch is already running on this orchestrator.
    #[error("a reconciliation batch is already running")]
    Busy,
    /// Fetching the corpus failed; without it no matching decision is
    /// meaningful.
    #[error("failed to fetch task corpus: {0}")]
    CorpusFetch(#[from] BackendError),
}

/// Drives the reconciliation pipeline across a batch of candidates.
///
/// At most one batch runs at a time: a second `reconcile` call while one is
/// in flight is rejected with [`ReconcileError::Busy`] rather than silently
/// skipped. Candidates are processed sequentially in input order against a
/// corpus snapshot fixed for the whole batch, so outcomes are deterministic;
/// a task created earlier in the batch is deliberately not visible to the
/// matching step of later candidates.
pub struct Reconciler {
    backend: Arc<dyn TaskBackend>,
    running: AtomicBool,
}

/// Resets the running flag even when a batch aborts early.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Reconciler {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self {
            backend,
            running: AtomicBool::new(false),
        }
    }

    /// Fetch a fresh corpus snapshot and reconcile the batch against it.
    pub async fn reconcile_batch(
        &self,
        candidates: Vec<CandidateTask>,
    ) -> Result<Vec<ReconciliationOutcome>, ReconcileError> {
        let _guard = self.acquire()?;
        let corpus = self.backend.list_tasks().await?;
        tracing::info!(
            candidates = candidates.len(),
            corpus = corpus.len(),
            "starting reconciliation batch"
        );
        Ok(self.run(candidates, &corpus).await)
    }

    /// Reconcile a batch against a caller-supplied corpus snapshot.
    pub async fn reconcile(
        &self,
        candidates: Vec<CandidateTask>,
        corpus: &[ExistingTask],
    ) -> Result<Vec<ReconciliationOutcome>, ReconcileError> {
        let _guard = self.acquire()?;
        Ok(self.run(candidates, corpus).await)
    }

    /// Transition Idle -> Running, or reject.
    fn acquire(&self) -> Result<RunningGuard<'_>, ReconcileError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ReconcileError::Busy)?;
        Ok(RunningGuard(&self.running))
    }

    /// Sequential per-candidate loop with failure isolation: one bad
    /// candidate never aborts the rest of the batch.
    async fn run(
        &self,
        candidates: Vec<CandidateTask>,
        corpus: &[ExistingTask],
    ) -> Vec<ReconciliationOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if candidate.title.trim().is_empty() {
                tracing::warn!(
                    source = %candidate.source_document,
                    "rejecting candidate without a title"
                );
                outcomes.push(ReconciliationOutcome::error(
                    candidate,
                    "candidate is missing a required title".to_string(),
                ));
                continue;
            }

            // Quality signal: a candidate without usable keywords can never
            // match, so it always falls through to a create.
            if extract_keywords(&candidate.match_text()).is_empty() {
                tracing::warn!(
                    title = %candidate.title,
                    source = %candidate.source_document,
                    "candidate has no usable keywords, similarity will be 0"
                );
            }

            let best = select_best_match(&candidate, corpus);
            let outcome = match plan_operation(&candidate, &best) {
                Operation::Create(fields) => match self.backend.create_task(fields).await {
                    Ok(task) => {
                        tracing::debug!(id = %task.id, title = %candidate.title, "created task");
                        ReconciliationOutcome {
                            action: OutcomeAction::Created,
                            candidate,
                            resulting_task: Some(task),
                            similarity: None,
                            error: None,
                        }
                    }
                    Err(e) => ReconciliationOutcome::error(candidate, e.to_string()),
                },
                Operation::Update {
                    id,
                    patch,
                    similarity,
                } => match self.backend.update_task(&id, patch).await {
                    Ok(task) => {
                        tracing::debug!(%id, similarity, title = %candidate.title, "updated task");
                        ReconciliationOutcome {
                            action: OutcomeAction::Updated,
                            candidate,
                            resulting_task: Some(task),
                            similarity: Some(similarity),
                            error: None,
                        }
                    }
                    Err(e) => ReconciliationOutcome::error(candidate, e.to_string()),
                },
            };
            outcomes.push(outcome);
        }

        let summary = BatchSummary::tally(&outcomes);
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            errors = summary.errors,
            "reconciliation batch finished"
        );
        outcomes
    }
}
