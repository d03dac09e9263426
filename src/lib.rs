//! # Blue Tasks
//!
//! Extracts actionable tasks from meeting text (transcripts, minutes) with a
//! language-model call and reconciles them against an existing task-tracking
//! backend.
//!
//! ## Flow
//!
//! ```text
//!   document ──▶ TaskExtractor ──▶ CandidateTask[]
//!                                       │
//!   TaskBackend ──▶ ExistingTask[] ─────┤
//!                                       ▼
//!                                  Reconciler
//!                       (match ▸ plan ▸ create/update)
//!                                       │
//!                                       ▼
//!                           ReconciliationOutcome[]
//! ```
//!
//! Per candidate the reconciler scores keyword containment against the
//! corpus snapshot and either updates the best match (similarity above the
//! threshold, append-only merge) or creates a new task. Failures are
//! isolated per candidate; one bad task never aborts the batch.
//!
//! ## Modules
//! - `reconcile`: the reconciliation engine (pure scoring + orchestration)
//! - `extraction`: LLM prompt, parsing and candidate coercion
//! - `backend`: task-tracker client trait and REST implementation
//! - `llm`: provider-agnostic chat client with retry
//! - `document`: validated text ingestion
//! - `api`: axum HTTP surface

pub mod api;
pub mod backend;
pub mod config;
pub mod document;
pub mod extraction;
pub mod llm;
pub mod reconcile;
pub mod task;

pub use config::Config;
