//! Match selection: ranking the existing corpus against a candidate.

use serde::Serialize;

use crate::task::{CandidateTask, ExistingTask};

use super::keywords::extract_keywords;
use super::similarity::score;

/// The best match found for a candidate, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub existing: Option<ExistingTask>,
    pub similarity: f64,
}

/// One entry of the full ranked list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub task: ExistingTask,
    pub similarity: f64,
}

/// Rank every task in the corpus against the given text, descending by
/// similarity.
///
/// Ties keep the corpus ordering (stable sort), so results are deterministic
/// for a fixed corpus. Exposed standalone for "find similar tasks" tooling;
/// the reconciliation path only consumes the top entry.
pub fn rank_matches(text: &str, corpus: &[ExistingTask]) -> Vec<RankedMatch> {
    let keywords = extract_keywords(text);
    let mut ranked: Vec<RankedMatch> = corpus
        .iter()
        .map(|task| RankedMatch {
            similarity: score(&keywords, &task.match_text()),
            task: task.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Select the best match for a candidate from the corpus snapshot.
///
/// Returns `{existing: None, similarity: 0}` for an empty corpus.
pub fn select_best_match(candidate: &CandidateTask, corpus: &[ExistingTask]) -> MatchResult {
    match rank_matches(&candidate.match_text(), corpus).into_iter().next() {
        Some(best) => MatchResult {
            existing: Some(best.task),
            similarity: best.similarity,
        },
        None => MatchResult {
            existing: None,
            similarity: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use std::collections::BTreeSet;

    fn existing(id: &str, title: &str, description: Option<&str>) -> ExistingTask {
        ExistingTask {
            id: id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            tags: BTreeSet::new(),
            priority: Priority::Medium,
            due_date: None,
        }
    }

    fn candidate(title: &str, description: &str) -> CandidateTask {
        CandidateTask {
            title: title.to_string(),
            description: description.to_string(),
            assignee: None,
            priority: Priority::Medium,
            due_date: None,
            tags: BTreeSet::new(),
            source_document: "reuniao.txt".to_string(),
        }
    }

    #[test]
    fn empty_corpus_yields_no_match() {
        let result = select_best_match(&candidate("Revisar design do dashboard", ""), &[]);
        assert!(result.existing.is_none());
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn best_scoring_task_wins() {
        let corpus = vec![
            existing("t1", "Comprar café para o escritório", None),
            existing("t2", "Atualizar ambiente de staging", Some("Configurar staging")),
        ];
        let result = select_best_match(
            &candidate("Atualizar ambiente de staging", ""),
            &corpus,
        );
        assert_eq!(result.existing.unwrap().id, "t2");
        assert!((result.similarity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_resolve_to_earliest_corpus_position() {
        let corpus = vec![
            existing("first", "Migrar banco de dados", None),
            existing("second", "Migrar banco de dados", None),
        ];
        let result = select_best_match(&candidate("Migrar banco", ""), &corpus);
        assert_eq!(result.existing.unwrap().id, "first");
    }

    #[test]
    fn ranked_list_is_sorted_descending() {
        let corpus = vec![
            existing("none", "Planejar festa de fim de ano", None),
            existing("full", "Atualizar ambiente de staging", None),
            existing("partial", "Atualizar documentação", None),
        ];
        let ranked = rank_matches("Atualizar ambiente staging", &corpus);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].task.id, "full");
        assert_eq!(ranked[1].task.id, "partial");
        assert_eq!(ranked[2].task.id, "none");
        assert!(ranked[0].similarity >= ranked[1].similarity);
        assert!(ranked[1].similarity >= ranked[2].similarity);
    }
}
