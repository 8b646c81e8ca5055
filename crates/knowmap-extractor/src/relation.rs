//! Relation Extraction (RE) module
//!
//! Extracts one (subject, relation, object) triple per sentence from
//! dependency-parser labels. This is a coarse heuristic: it does not check
//! that the three tokens belong to the same clause, and it ignores
//! coordination, negation and long-distance dependencies.

use knowmap_core::Triple;

use crate::token::{Sentence, Token};
use crate::RelationExtractor;

// ============================================================================
// Label sets
// ============================================================================

/// Dependency roles that fill the subject slot
pub const SUBJECT_DEPS: &[&str] = &["nsubj", "nsubjpass"];

/// Dependency roles that fill the object slot
pub const OBJECT_DEPS: &[&str] = &["dobj", "pobj", "attr", "dative", "oprd"];

/// Part-of-speech tag that fills the relation slot
pub const RELATION_POS: &str = "VERB";

// ============================================================================
// Rule-based RE
// ============================================================================

/// Slots filled while scanning a sentence; later matches overwrite earlier ones
#[derive(Debug, Default)]
struct Slots<'a> {
    subject: Option<&'a str>,
    relation: Option<&'a str>,
    object: Option<&'a str>,
}

impl<'a> Slots<'a> {
    fn into_triple(self) -> Option<Triple> {
        match (self.subject, self.relation, self.object) {
            (Some(s), Some(r), Some(o)) if !s.is_empty() && !r.is_empty() && !o.is_empty() => {
                Some(Triple::new(s, r, o))
            }
            _ => None,
        }
    }
}

/// Subject/verb/object extractor over dependency labels
///
/// Scans tokens in order. A token whose role is a subject role sets the
/// subject, a token tagged `VERB` sets the relation, and a token whose role
/// is an object role sets the object. Each check is independent, so one
/// token can fill more than one slot. The last match for each slot wins.
/// A triple is produced only when all three slots are filled.
#[derive(Debug, Clone)]
pub struct DependencyRelationExtractor {
    subject_deps: Vec<String>,
    object_deps: Vec<String>,
    relation_pos: String,
}

impl DependencyRelationExtractor {
    /// Create an extractor with the spaCy English label set
    pub fn new() -> Self {
        Self {
            subject_deps: SUBJECT_DEPS.iter().map(|s| s.to_string()).collect(),
            object_deps: OBJECT_DEPS.iter().map(|s| s.to_string()).collect(),
            relation_pos: RELATION_POS.to_string(),
        }
    }

    fn is_subject(&self, token: &Token) -> bool {
        self.subject_deps.iter().any(|d| *d == token.dep)
    }

    fn is_relation(&self, token: &Token) -> bool {
        token.pos == self.relation_pos
    }

    fn is_object(&self, token: &Token) -> bool {
        self.object_deps.iter().any(|d| *d == token.dep)
    }
}

impl Default for DependencyRelationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationExtractor for DependencyRelationExtractor {
    fn extract_sentence(&self, sentence: &Sentence) -> Option<Triple> {
        let mut slots = Slots::default();

        for token in &sentence.tokens {
            if self.is_subject(token) {
                slots.subject = Some(token.text.as_str());
            }
            if self.is_relation(token) {
                slots.relation = Some(token.text.as_str());
            }
            if self.is_object(token) {
                slots.object = Some(token.text.as_str());
            }
        }

        let triple = slots.into_triple();
        if triple.is_none() {
            tracing::trace!(sentence = %sentence.text(), "no triple in sentence");
        }
        triple
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ParsedDocument;

    fn tok(text: &str, pos: &str, dep: &str) -> Token {
        Token::new(text, pos, dep)
    }

    #[test]
    fn test_simple_svo() {
        let re = DependencyRelationExtractor::new();
        let sentence = Sentence::new(vec![
            tok("AI", "PROPN", "nsubj"),
            tok("improves", "VERB", "ROOT"),
            tok("healthcare", "NOUN", "dobj"),
        ]);

        let triple = re.extract_sentence(&sentence).unwrap();
        assert_eq!(triple, Triple::new("AI", "improves", "healthcare"));
    }

    #[test]
    fn test_missing_object_yields_nothing() {
        let re = DependencyRelationExtractor::new();
        let sentence = Sentence::new(vec![
            tok("AI", "PROPN", "nsubj"),
            tok("grows", "VERB", "ROOT"),
            tok(".", "PUNCT", "punct"),
        ]);

        assert!(re.extract_sentence(&sentence).is_none());
    }

    #[test]
    fn test_missing_verb_yields_nothing() {
        let re = DependencyRelationExtractor::new();
        // Copula tagged AUX, not VERB
        let sentence = Sentence::new(vec![
            tok("Google", "PROPN", "nsubj"),
            tok("is", "AUX", "ROOT"),
            tok("company", "NOUN", "attr"),
        ]);

        assert!(re.extract_sentence(&sentence).is_none());
    }

    #[test]
    fn test_last_match_wins() {
        let re = DependencyRelationExtractor::new();
        // "Doctors said patients used the tool in hospitals"
        let sentence = Sentence::new(vec![
            tok("Doctors", "NOUN", "nsubj"),
            tok("said", "VERB", "ROOT"),
            tok("patients", "NOUN", "nsubj"),
            tok("used", "VERB", "ccomp"),
            tok("tool", "NOUN", "dobj"),
            tok("in", "ADP", "prep"),
            tok("hospitals", "NOUN", "pobj"),
        ]);

        let triple = re.extract_sentence(&sentence).unwrap();
        assert_eq!(triple, Triple::new("patients", "used", "hospitals"));
    }

    #[test]
    fn test_passive_subject_and_object_roles() {
        let re = DependencyRelationExtractor::new();
        for dep in OBJECT_DEPS {
            let sentence = Sentence::new(vec![
                tok("Cancer", "NOUN", "nsubjpass"),
                tok("detected", "VERB", "ROOT"),
                tok("networks", "NOUN", dep),
            ]);
            let triple = re.extract_sentence(&sentence).unwrap();
            assert_eq!(triple.subject, "Cancer");
            assert_eq!(triple.object, "networks");
        }
    }

    #[test]
    fn test_one_token_fills_two_slots() {
        let re = DependencyRelationExtractor::new();
        let sentence = Sentence::new(vec![
            tok("Researchers", "NOUN", "nsubj"),
            tok("enjoy", "VERB", "ROOT"),
            tok("running", "VERB", "dobj"),
        ]);

        let triple = re.extract_sentence(&sentence).unwrap();
        assert_eq!(triple, Triple::new("Researchers", "running", "running"));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let re = DependencyRelationExtractor::new();
        let sentence = Sentence::new(vec![
            tok("AI", "PROPN", "NSUBJ"),
            tok("improves", "verb", "ROOT"),
            tok("healthcare", "NOUN", "dobj"),
        ]);

        assert!(re.extract_sentence(&sentence).is_none());
    }

    #[test]
    fn test_empty_sentence() {
        let re = DependencyRelationExtractor::new();
        assert!(re.extract_sentence(&Sentence::default()).is_none());
    }

    #[test]
    fn test_document_order_preserved() {
        let re = DependencyRelationExtractor::new();
        let doc = ParsedDocument::new(vec![
            Sentence::new(vec![
                tok("AI", "PROPN", "nsubj"),
                tok("improves", "VERB", "ROOT"),
                tok("healthcare", "NOUN", "dobj"),
            ]),
            Sentence::new(vec![tok("Hello", "INTJ", "ROOT")]),
            Sentence::new(vec![
                tok("Google", "PROPN", "nsubj"),
                tok("invests", "VERB", "ROOT"),
                tok("in", "ADP", "prep"),
                tok("AI", "PROPN", "pobj"),
            ]),
        ]);

        let triples = re.extract(&doc);
        assert_eq!(
            triples,
            vec![
                Triple::new("AI", "improves", "healthcare"),
                Triple::new("Google", "invests", "AI"),
            ]
        );
    }
}
