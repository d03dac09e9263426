//! Merge planning: deciding create vs. update and computing merged fields.

use std::collections::BTreeSet;

use crate::task::{CandidateTask, NewTask, TaskPatch};

use super::matcher::MatchResult;

/// Minimum similarity (exclusive) for a candidate to be treated as an
/// update of an existing task. At exactly this value the decision is CREATE.
pub const MATCH_THRESHOLD: f64 = 0.7;

/// Separator prepended to a candidate's description when appending it to an
/// existing one. Prior content is never discarded.
const UPDATE_SEPARATOR: &str = "\n\n---\nAtualização da reunião:\n";

/// Tags applied to a created task when the extraction produced none.
const DEFAULT_TAGS: &[&str] = &["meeting", "auto-generated"];

/// The operation the orchestrator should execute for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create(NewTask),
    Update {
        id: String,
        patch: TaskPatch,
        similarity: f64,
    },
}

/// Decide create vs. update for a candidate given its best match.
///
/// Emits an update only when a match exists with similarity strictly above
/// [`MATCH_THRESHOLD`]. Updates merge only description (append-only) and
/// tags (set union); priority, due date and assignee on the existing task
/// are never overwritten from a re-extraction. Pure computation, no backend
/// calls.
pub fn plan_operation(candidate: &CandidateTask, best: &MatchResult) -> Operation {
    if let Some(existing) = &best.existing {
        if best.similarity > MATCH_THRESHOLD {
            let merged_tags: BTreeSet<String> = existing
                .tags
                .union(&candidate.tags)
                .cloned()
                .collect();
            return Operation::Update {
                id: existing.id.clone(),
                patch: TaskPatch {
                    description: Some(merge_descriptions(
                        existing.description.as_deref(),
                        &candidate.description,
                    )),
                    tags: Some(merged_tags),
                },
                similarity: best.similarity,
            };
        }
    }

    let tags = if candidate.tags.is_empty() {
        DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        candidate.tags.clone()
    };

    Operation::Create(NewTask {
        title: candidate.title.clone(),
        description: candidate.description.clone(),
        priority: candidate.priority,
        // Passed through verbatim; date validation is an upstream concern.
        due_date: candidate.due_date.clone(),
        tags,
    })
}

/// Append-only description merge.
fn merge_descriptions(existing: Option<&str>, candidate: &str) -> String {
    match existing {
        Some(current) if !current.trim().is_empty() => {
            format!("{}{}{}", current, UPDATE_SEPARATOR, candidate)
        }
        _ => candidate.to_string(),
    }
}
