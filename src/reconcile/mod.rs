//! Task reconciliation engine.
//!
//! Takes a batch of candidate tasks extracted from meeting text plus a
//! snapshot of the existing task corpus, and produces one create/update/error
//! outcome per candidate. Scoring and planning are pure functions; only the
//! orchestrator talks to the backend.
//!
//! Pipeline per candidate:
//! 1. `keywords` - normalize the candidate's text into significant tokens
//! 2. `similarity` - score those tokens against each existing task
//! 3. `matcher` - pick the best-scoring existing task
//! 4. `planner` - decide create vs. update and compute merged fields
//! 5. `orchestrator` - execute the operation and aggregate outcomes

pub mod keywords;
pub mod matcher;
pub mod orchestrator;
pub mod planner;
pub mod similarity;

pub use keywords::extract_keywords;
pub use matcher::{rank_matches, select_best_match, MatchResult, RankedMatch};
pub use orchestrator::{
    BatchSummary, OutcomeAction, ReconcileError, ReconciliationOutcome, Reconciler,
};
pub use planner::{plan_operation, Operation, MATCH_THRESHOLD};
pub use similarity::score;
