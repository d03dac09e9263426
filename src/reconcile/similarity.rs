//! Similarity scoring between a candidate's keywords and an existing task.

use std::collections::BTreeSet;

/// Score a candidate's keyword set against an existing task's text.
///
/// Counts how many candidate keywords appear as substrings of the lowercased
/// existing text and returns `matched / |keywords|`, so the result is always
/// in `[0, 1]`. An empty keyword set scores 0.
///
/// This is an asymmetric containment measure, deliberately not Jaccard or
/// cosine: it rewards candidates whose keywords are covered by the existing
/// task's text regardless of how much extra text that task has. The match
/// threshold in the planner is calibrated to this semantics.
pub fn score(candidate_keywords: &BTreeSet<String>, existing_text: &str) -> f64 {
    if candidate_keywords.is_empty() {
        return 0.0;
    }
    let haystack = existing_text.to_lowercase();
    let matched = candidate_keywords
        .iter()
        .filter(|keyword| haystack.contains(keyword.as_str()))
        .count();
    matched as f64 / candidate_keywords.len() as f64
}
