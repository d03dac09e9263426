//! LLM-backed task extraction from meeting text.
//!
//! Owns the prompt, the response parsing, and the validation/coercion of the
//! model's loosely-typed output into strict [`CandidateTask`] values. The
//! reconciliation engine never sees a partially-typed candidate.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::llm::{ChatMessage, ChatOptions, LlmClient, Role};
use crate::task::{CandidateTask, Priority};

/// Errors from the extraction step.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("language model call failed: {0}")]
    Llm(String),
    #[error("language model returned no content")]
    EmptyResponse,
    #[error("language model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Extracts candidate tasks from free-form meeting text.
pub struct TaskExtractor {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl TaskExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Extract candidate tasks from a document's text.
    pub async fn extract(
        &self,
        text: &str,
        doc_name: &str,
    ) -> Result<Vec<CandidateTask>, ExtractionError> {
        let messages = [
            ChatMessage::new(Role::System, SYSTEM_PROMPT),
            ChatMessage::new(Role::User, build_prompt(text, doc_name)),
        ];
        let options = ChatOptions {
            temperature: Some(0.0),
            ..ChatOptions::default()
        };

        let response = self
            .llm
            .chat_completion(&self.model, &messages, options)
            .await
            .map_err(|e| ExtractionError::Llm(e.to_string()))?;

        let content = response.content.ok_or(ExtractionError::EmptyResponse)?;
        let candidates = parse_candidates(&content, doc_name)?;
        tracing::info!(
            document = %doc_name,
            count = candidates.len(),
            model = %self.model,
            "extracted candidate tasks"
        );
        Ok(candidates)
    }
}

const SYSTEM_PROMPT: &str = "Você é um assistente que extrai tarefas acionáveis de atas e \
transcrições de reuniões. Responda somente com JSON válido, sem texto adicional.";

fn build_prompt(text: &str, doc_name: &str) -> String {
    format!(
        r#"Extraia todas as tarefas acionáveis do documento "{doc_name}" abaixo.

Responda com um array JSON em que cada tarefa tem os campos:
- "title": título curto da tarefa (obrigatório)
- "description": descrição em uma ou duas frases
- "assignee": responsável, ou null se não mencionado
- "priority": "low", "medium" ou "high"
- "dueDate": data no formato YYYY-MM-DD, ou null se não mencionada
- "tags": lista de etiquetas curtas

Documento:
{text}"#
    )
}

/// Loosely-typed task shape as the model tends to produce it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, alias = "due_date")]
    due_date: Option<String>,
    // Option rather than a bare Vec: models emit an explicit `"tags": null`
    // despite the prompt, and that must coerce instead of failing the batch.
    #[serde(default)]
    tags: Option<Vec<String>>,
}

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"))
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("static regex"))
}

/// Pull the JSON array out of the model's answer.
///
/// Models wrap output in code fences or prepend prose despite instructions,
/// so try a fenced block first, then the outermost bracket pair.
fn extract_json_array(raw: &str) -> Option<String> {
    let unfenced = match fence_regex().captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()).trim().to_string(),
        None => raw.trim().to_string(),
    };
    let start = unfenced.find('[')?;
    let end = unfenced.rfind(']')?;
    if start < end {
        Some(unfenced[start..=end].to_string())
    } else {
        None
    }
}

/// Validate and coerce the model output into strict candidates.
///
/// Entries without a usable title are dropped with a warning; unrecognized
/// priorities coerce to medium; due dates that are not `YYYY-MM-DD` coerce
/// to None; a missing description defaults to the title.
pub(crate) fn parse_candidates(
    raw: &str,
    doc_name: &str,
) -> Result<Vec<CandidateTask>, ExtractionError> {
    let json = extract_json_array(raw)
        .ok_or_else(|| ExtractionError::MalformedOutput("no JSON array in output".to_string()))?;

    let raw_candidates: Vec<RawCandidate> = serde_json::from_str(&json)
        .map_err(|e| ExtractionError::MalformedOutput(e.to_string()))?;

    let mut candidates = Vec::with_capacity(raw_candidates.len());
    for raw in raw_candidates {
        let Some(title) = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
        else {
            tracing::warn!(document = %doc_name, "dropping extracted task without a title");
            continue;
        };

        let description = raw
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| title.clone());

        let due_date = raw.due_date.filter(|d| {
            let valid = iso_date_regex().is_match(d);
            if !valid {
                tracing::warn!(document = %doc_name, date = %d, "dropping non-ISO due date");
            }
            valid
        });

        let tags: BTreeSet<String> = raw
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        candidates.push(CandidateTask {
            title,
            description,
            assignee: raw.assignee.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            priority: raw.priority.as_deref().map(Priority::parse).unwrap_or_default(),
            due_date,
            tags,
            source_document: doc_name.to_string(),
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json_array() {
        let raw = r#"[{"title": "Atualizar staging", "description": "Subir a nova versão",
            "priority": "alta", "dueDate": "2026-09-01", "tags": ["infra"]}]"#;
        let candidates = parse_candidates(raw, "reuniao.txt").unwrap();
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.title, "Atualizar staging");
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.due_date.as_deref(), Some("2026-09-01"));
        assert!(c.tags.contains("infra"));
        assert_eq!(c.source_document, "reuniao.txt");
    }

    #[test]
    fn strips_code_fences_and_surrounding_prose() {
        let raw = "Aqui estão as tarefas:\n```json\n[{\"title\": \"Revisar contrato\"}]\n```\n";
        let candidates = parse_candidates(raw, "ata.md").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Revisar contrato");
        // Description defaults to the title.
        assert_eq!(candidates[0].description, "Revisar contrato");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_candidates("[{\"title\": }]", "doc"),
            Err(ExtractionError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_candidates("sem tarefas aqui", "doc"),
            Err(ExtractionError::MalformedOutput(_))
        ));
    }

    #[test]
    fn drops_entries_without_title() {
        let raw = r#"[{"description": "sem título"}, {"title": "  "}, {"title": "Válida"}]"#;
        let candidates = parse_candidates(raw, "doc").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Válida");
    }

    #[test]
    fn coerces_unrecognized_priority_and_bad_dates() {
        let raw = r#"[{"title": "Tarefa", "priority": "urgentíssima", "dueDate": "amanhã"}]"#;
        let candidates = parse_candidates(raw, "doc").unwrap();
        assert_eq!(candidates[0].priority, Priority::Medium);
        assert!(candidates[0].due_date.is_none());
    }

    #[test]
    fn null_fields_coerce_instead_of_failing() {
        let raw = r#"[{"title": "Tarefa", "description": null, "assignee": null,
            "priority": null, "dueDate": null, "tags": null}]"#;
        let candidates = parse_candidates(raw, "doc").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].description, "Tarefa");
        assert_eq!(candidates[0].priority, Priority::Medium);
        assert!(candidates[0].tags.is_empty());
        assert!(candidates[0].due_date.is_none());
    }

    #[test]
    fn blank_tags_and_assignee_are_dropped() {
        let raw = r#"[{"title": "Tarefa", "assignee": "  ", "tags": ["", "  ", "infra"]}]"#;
        let candidates = parse_candidates(raw, "doc").unwrap();
        assert!(candidates[0].assignee.is_none());
        assert_eq!(candidates[0].tags.len(), 1);
    }
}
