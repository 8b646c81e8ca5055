//! KnowMap Extractor - Knowledge extraction pipeline
//!
//! Turns raw text into (subject, relation, object) triples:
//! - Text normalization and sentence preprocessing
//! - Token streams from an external dependency parser
//! - Rule-based relation extraction over dependency labels
//! - Named entity grouping from IOB tags

use knowmap_core::{Result, Triple};

pub mod entities;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod relation;
pub mod token;

pub use entities::{extract_entities, NamedEntity};
pub use normalize::{clean_text, preprocess_sentences};
pub use parser::{load_token_file, parse_conllu, parse_json_stream, CommandParser, TokenFormat};
pub use pipeline::{Pipeline, PipelineOutput};
pub use relation::DependencyRelationExtractor;
pub use token::{ParsedDocument, Sentence, Token};

/// Trait for dependency parsers (sentence segmentation + tagging)
///
/// Implementations wrap an external NLP service; nothing in this crate
/// segments or tags text itself.
pub trait DependencyParser {
    fn parse(&self, text: &str) -> Result<ParsedDocument>;

    /// Parser name for logging
    fn name(&self) -> &str;
}

/// Trait for relation extractors
pub trait RelationExtractor {
    /// Extract at most one triple from a sentence
    fn extract_sentence(&self, sentence: &Sentence) -> Option<Triple>;

    /// Extract triples from every sentence, in document order
    fn extract(&self, document: &ParsedDocument) -> Vec<Triple> {
        document
            .sentences
            .iter()
            .filter_map(|s| self.extract_sentence(s))
            .collect()
    }
}
