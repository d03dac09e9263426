//! Keyword extraction from free-form task text.

use std::collections::BTreeSet;

/// Words too common to carry matching signal.
///
/// Meeting text routinely mixes Portuguese and English, so the list spans
/// both: articles, conjunctions, and common prepositions. Tokens of length
/// <= 2 are dropped before this list is consulted, which already covers the
/// short function words of both languages (de, do, em, no, of, to, ...).
const STOP_WORDS: &[&str] = &[
    // Portuguese
    "uma", "uns", "umas", "dos", "das", "nos", "nas", "por", "para", "com",
    "sem", "sob", "sobre", "que", "não", "nao", "mas", "como", "pelo", "pela",
    "pelos", "pelas", "aos", "até", "ate", "ser", "ter", "foi", "são", "sao",
    "está", "esta", "estão", "estao", "isso", "esse", "essa", "este", "deve",
    "também", "tambem", "mais", "fazer", "precisa", "vamos",
    // English
    "the", "and", "for", "with", "that", "this", "from", "into", "are",
    "was", "were", "will", "would", "should", "could", "have", "has", "had",
    "not", "but", "all", "can", "may", "our", "your", "their", "than",
    "then", "when", "where", "which", "who", "what", "how", "about", "over",
    "under", "between", "after", "before", "during", "each", "need", "must",
];

/// Normalize free text into a set of significant tokens.
///
/// Lowercases, replaces any non-alphanumeric character with whitespace,
/// splits, then drops stop-words and tokens of length <= 2. Pure function;
/// duplicates collapse into the set.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_is_deterministic() {
        let text = "Atualizar o ambiente de staging para a nova versão";
        assert_eq!(extract_keywords(text), extract_keywords(text));
    }

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let keywords = extract_keywords("Atualizar o ambiente de staging com a equipe");
        assert!(keywords.contains("atualizar"));
        assert!(keywords.contains("ambiente"));
        assert!(keywords.contains("staging"));
        assert!(keywords.contains("equipe"));
        assert!(!keywords.contains("o"));
        assert!(!keywords.contains("de"));
        assert!(!keywords.contains("com"));
    }

    #[test]
    fn strips_punctuation_and_collapses_duplicates() {
        let keywords = extract_keywords("Deploy! deploy, DEPLOY... (deploy)");
        assert_eq!(keywords.len(), 1);
        assert!(keywords.contains("deploy"));
    }

    #[test]
    fn keeps_accented_words_intact() {
        let keywords = extract_keywords("Revisão do orçamento trimestral");
        assert!(keywords.contains("revisão"));
        assert!(keywords.contains("orçamento"));
        assert!(keywords.contains("trimestral"));
    }

    #[test]
    fn empty_and_degenerate_input_yield_empty_set() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   !!! ...").is_empty());
        assert!(extract_keywords("a de o e").is_empty());
    }
}
