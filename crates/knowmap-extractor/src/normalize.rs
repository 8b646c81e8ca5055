//! Text normalization and sentence preprocessing

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{ParsedDocument, Token};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.]").expect("valid regex"));

/// English stop words used when the parser does not flag them
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am",
        "among", "an", "and", "any", "are", "as", "at", "be", "became", "because", "been",
        "before", "being", "below", "between", "both", "but", "by", "can", "could", "did", "do",
        "does", "doing", "done", "down", "during", "each", "either", "else", "even", "ever",
        "every", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
        "into", "is", "it", "its", "itself", "just", "least", "less", "made", "many", "may",
        "me", "might", "more", "most", "much", "must", "my", "myself", "neither", "no", "nor",
        "not", "now", "of", "off", "often", "on", "once", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "per", "perhaps", "quite", "rather", "really", "same",
        "she", "should", "since", "so", "some", "still", "such", "than", "that", "the", "their",
        "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
        "though", "through", "thus", "to", "too", "under", "until", "up", "upon", "us", "used",
        "using", "various", "very", "via", "was", "we", "well", "were", "what", "whatever",
        "when", "where", "whether", "which", "while", "who", "whom", "whose", "why", "will",
        "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Strip whitespace and punctuation noise from raw text
///
/// Collapses whitespace runs to one space, removes every character that is
/// not a word character, whitespace or `.`, then trims.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let stripped = SPECIAL_CHARS.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Whether a word is in the built-in English stop-word list
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

fn is_stop(token: &Token) -> bool {
    token.is_stop.unwrap_or_else(|| is_stop_word(&token.text))
}

fn is_punct(token: &Token) -> bool {
    token.pos == "PUNCT"
        || (!token.text.is_empty() && token.text.chars().all(|c| !c.is_alphanumeric()))
}

/// Lowercased lemmas of content tokens, one string per sentence
pub fn preprocess_sentences(document: &ParsedDocument) -> Vec<String> {
    document
        .sentences
        .iter()
        .map(|sentence| {
            sentence
                .tokens
                .iter()
                .filter(|t| !is_stop(t) && !is_punct(t))
                .map(|t| t.lemma().to_lowercase())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
