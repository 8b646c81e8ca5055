//! Named entity grouping
//!
//! The dependency parser may tag tokens with IOB entity markers. This module
//! joins `B`/`I` runs into entity spans; it does no recognition of its own.

use serde::{Deserialize, Serialize};

use crate::token::{ParsedDocument, Token};

/// A named entity span reported by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Surface text, tokens joined by single spaces
    pub text: String,
    /// Entity label (e.g. "ORG", "PERSON")
    pub label: String,
}

impl std::fmt::Display for NamedEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.text, self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Iob {
    Begin,
    Inside,
    Outside,
}

impl Iob {
    fn of(token: &Token) -> Self {
        match token.ent_iob.as_deref() {
            Some("B") => Self::Begin,
            Some("I") => Self::Inside,
            _ => Self::Outside,
        }
    }
}

/// Collect entity spans in document order
///
/// An `I` token continues the open span only when its label matches;
/// otherwise it starts a new span. Spans never cross sentence boundaries.
pub fn extract_entities(document: &ParsedDocument) -> Vec<NamedEntity> {
    let mut entities = Vec::new();

    for sentence in &document.sentences {
        let mut open: Option<(Vec<&str>, &str)> = None;

        for token in &sentence.tokens {
            let label = token.ent_type.as_deref().unwrap_or_default();
            let iob = Iob::of(token);

            let continues =
                iob == Iob::Inside && open.as_ref().is_some_and(|(_, l)| *l == label);
            if continues {
                if let Some((words, _)) = open.as_mut() {
                    words.push(token.text.as_str());
                }
                continue;
            }

            if let Some(span) = open.take() {
                entities.push(close(span));
            }
            if iob != Iob::Outside && !label.is_empty() {
                open = Some((vec![token.text.as_str()], label));
            }
        }

        if let Some(span) = open.take() {
            entities.push(close(span));
        }
    }

    entities
}

fn close((words, label): (Vec<&str>, &str)) -> NamedEntity {
    NamedEntity {
        text: words.join(" "),
        label: label.to_string(),
    }
}
