//! Token stream model produced by dependency parsers

use serde::{Deserialize, Serialize};

/// A token annotated by the dependency parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,

    /// Lemma; empty means "same as text"
    #[serde(default)]
    pub lemma: String,

    /// Coarse part-of-speech tag (e.g. "VERB", "NOUN", "PUNCT")
    pub pos: String,

    /// Dependency role label (e.g. "nsubj", "dobj", "ROOT")
    pub dep: String,

    /// Stop-word flag, when the parser supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stop: Option<bool>,

    /// IOB entity marker ("B", "I" or "O")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ent_iob: Option<String>,

    /// Entity label (e.g. "ORG")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ent_type: Option<String>,
}

impl Token {
    pub fn new(text: impl Into<String>, pos: impl Into<String>, dep: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lemma: String::new(),
            pos: pos.into(),
            dep: dep.into(),
            is_stop: None,
            ent_iob: None,
            ent_type: None,
        }
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    pub fn with_stop(mut self, is_stop: bool) -> Self {
        self.is_stop = Some(is_stop);
        self
    }

    /// Attach an IOB entity tag
    pub fn with_entity(mut self, iob: impl Into<String>, label: impl Into<String>) -> Self {
        self.ent_iob = Some(iob.into());
        self.ent_type = Some(label.into());
        self
    }

    /// Lemma, falling back to the surface text
    pub fn lemma(&self) -> &str {
        if self.lemma.is_empty() {
            &self.text
        } else {
            &self.lemma
        }
    }
}

/// One sentence of tokens, in text order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Surface tokens joined by single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parser output: a sequence of sentences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub sentences: Vec<Sentence>,
}

impl ParsedDocument {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.iter().all(Sentence::is_empty)
    }

    /// Total token count across sentences
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(|s| s.tokens.len()).sum()
    }
}
