//! Task types shared between the extraction boundary, the reconciliation
//! engine, and the backend client.
//!
//! Candidates are ephemeral: produced by one extraction batch, consumed by
//! one reconciliation pass, then discarded. Existing tasks are owned by the
//! external backend and treated as read-mostly here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Task priority.
///
/// Upstream collaborators speak different vocabularies for the same three
/// levels (the LLM may answer in English or Portuguese depending on the
/// meeting language), so this is a single internal enum with an explicit
/// mapping table per vocabulary rather than raw strings compared ad hoc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Map a free-text priority from any supported vocabulary.
    ///
    /// Case-insensitive; unrecognized or empty input maps to `Medium`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" | "baixa" => Priority::Low,
            "high" | "alta" => Priority::High,
            "medium" | "média" | "media" => Priority::Medium,
            _ => Priority::Medium,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A task extracted from meeting text, not yet reconciled against the
/// backend.
///
/// Instances reaching the engine have already been validated and coerced at
/// the extraction boundary; the engine still rejects an empty title with an
/// error outcome rather than guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTask {
    pub title: String,
    /// Defaults to the title when the extraction produced none.
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// ISO date `YYYY-MM-DD`, or None. Passed through verbatim to the
    /// backend; date parsing is an upstream concern.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Identifier of the originating document.
    pub source_document: String,
}

impl CandidateTask {
    /// Text used for keyword extraction: title and description together.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// A task record already stored in the external task backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingTask {
    /// Opaque, stable backend identifier.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl ExistingTask {
    /// Text a candidate's keywords are matched against.
    pub fn match_text(&self) -> String {
        match &self.description {
            Some(d) => format!("{} {}", self.title, d),
            None => self.title.clone(),
        }
    }
}

/// Field values for a task creation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub tags: BTreeSet<String>,
}

/// Field values for a task update call.
///
/// Only description and tags are ever patched; priority, due date and
/// assignee set by a human are never overwritten from a re-extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_maps_both_vocabularies() {
        assert_eq!(Priority::parse("high"), Priority::High);
        assert_eq!(Priority::parse("Alta"), Priority::High);
        assert_eq!(Priority::parse("ALTA"), Priority::High);
        assert_eq!(Priority::parse("baixa"), Priority::Low);
        assert_eq!(Priority::parse("LOW"), Priority::Low);
        assert_eq!(Priority::parse("média"), Priority::Medium);
        assert_eq!(Priority::parse("media"), Priority::Medium);
        assert_eq!(Priority::parse("medium"), Priority::Medium);
    }

    #[test]
    fn priority_defaults_to_medium_on_unrecognized_input() {
        assert_eq!(Priority::parse(""), Priority::Medium);
        assert_eq!(Priority::parse("urgentíssima"), Priority::Medium);
        assert_eq!(Priority::parse("  high  "), Priority::High);
    }

    #[test]
    fn existing_task_match_text_skips_missing_description() {
        let task = ExistingTask {
            id: "t1".into(),
            title: "Revisar contrato".into(),
            description: None,
            tags: BTreeSet::new(),
            priority: Priority::Medium,
            due_date: None,
        };
        assert_eq!(task.match_text(), "Revisar contrato");
    }
}
