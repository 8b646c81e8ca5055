//! Text -> triples pipeline

use serde::{Deserialize, Serialize};

use knowmap_core::{Result, Triple};

use crate::entities::{extract_entities, NamedEntity};
use crate::normalize::{clean_text, preprocess_sentences};
use crate::relation::DependencyRelationExtractor;
use crate::token::ParsedDocument;
use crate::{DependencyParser, RelationExtractor};

/// Everything the pipeline derives from one input text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Content lemmas per sentence
    pub cleaned_sentences: Vec<String>,
    /// Entity spans tagged by the parser
    pub entities: Vec<NamedEntity>,
    /// Extracted triples, in sentence order
    pub relations: Vec<Triple>,
}

impl PipelineOutput {
    /// Whether there is anything to visualize
    pub fn has_relations(&self) -> bool {
        !self.relations.is_empty()
    }
}

/// Runs preprocessing, entity grouping and relation extraction
pub struct Pipeline<E = DependencyRelationExtractor> {
    extractor: E,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            extractor: DependencyRelationExtractor::new(),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RelationExtractor> Pipeline<E> {
    /// Use a different relation extractor
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Analyze an already-parsed document
    pub fn analyze(&self, document: &ParsedDocument) -> PipelineOutput {
        self.analyze_parts(document, document)
    }

    /// Parse raw text with an external parser and analyze it
    ///
    /// Relations and entities come from the raw text; cleaned sentences come
    /// from the normalized text, which is parsed separately when
    /// normalization changed anything.
    pub fn run(&self, parser: &dyn DependencyParser, text: &str) -> Result<PipelineOutput> {
        let raw = parser.parse(text)?;

        let cleaned = clean_text(text);
        let output = if cleaned == text {
            self.analyze_parts(&raw, &raw)
        } else {
            let normalized = parser.parse(&cleaned)?;
            self.analyze_parts(&raw, &normalized)
        };

        tracing::info!(
            parser = parser.name(),
            sentences = raw.sentences.len(),
            entities = output.entities.len(),
            relations = output.relations.len(),
            "pipeline finished"
        );
        Ok(output)
    }

    fn analyze_parts(&self, raw: &ParsedDocument, normalized: &ParsedDocument) -> PipelineOutput {
        PipelineOutput {
            cleaned_sentences: preprocess_sentences(normalized),
            entities: extract_entities(raw),
            relations: self.extractor.extract(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Sentence, Token};
    use std::cell::RefCell;

    /// Returns a fixed document and records every text it was asked to parse
    struct StubParser {
        document: ParsedDocument,
        calls: RefCell<Vec<String>>,
    }

    impl DependencyParser for StubParser {
        fn parse(&self, text: &str) -> Result<ParsedDocument> {
            self.calls.borrow_mut().push(text.to_string());
            Ok(self.document.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn stub() -> StubParser {
        StubParser {
            document: ParsedDocument::new(vec![Sentence::new(vec![
                Token::new("AI", "PROPN", "nsubj").with_entity("B", "ORG"),
                Token::new("improves", "VERB", "ROOT").with_lemma("improve"),
                Token::new("healthcare", "NOUN", "dobj"),
                Token::new(".", "PUNCT", "punct"),
            ])]),
            calls: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_analyze() {
        let parser = stub();
        let output = Pipeline::new().analyze(&parser.document);

        assert_eq!(output.cleaned_sentences, vec!["ai improve healthcare"]);
        assert_eq!(output.entities.len(), 1);
        assert_eq!(
            output.relations,
            vec![Triple::new("AI", "improves", "healthcare")]
        );
        assert!(output.has_relations());
    }

    #[test]
    fn test_run_parses_clean_text_once() {
        let parser = stub();
        Pipeline::new()
            .run(&parser, "AI improves healthcare.")
            .unwrap();

        assert_eq!(parser.calls.borrow().len(), 1);
    }

    #[test]
    fn test_run_parses_normalized_text_separately() {
        let parser = stub();
        Pipeline::new()
            .run(&parser, "AI  improves (healthcare)!")
            .unwrap();

        let calls = parser.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], "AI improves healthcare");
    }

    #[test]
    fn test_empty_document_has_no_relations() {
        let output = Pipeline::new().analyze(&ParsedDocument::default());
        assert!(!output.has_relations());
        assert!(output.cleaned_sentences.is_empty());
    }
}
