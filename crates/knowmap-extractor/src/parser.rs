//! Dependency parser adapters
//!
//! Sentence segmentation and tagging are delegated to an external NLP
//! service. This module reads the token streams such services emit:
//! - JSON token streams (`{"sentences": [{"tokens": [...]}]}`)
//! - CoNLL-U (one token per line, blank line between sentences)
//! - a subprocess that reads text on stdin and writes a JSON token stream

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use knowmap_core::{KnowMapError, Result};

use crate::token::{ParsedDocument, Sentence, Token};
use crate::DependencyParser;

// ============================================================================
// Formats
// ============================================================================

/// Serialized token stream formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Json,
    Conllu,
}

impl TokenFormat {
    /// Detect format from file extension (`.conllu`/`.conll` vs anything else)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("conllu") || ext.eq_ignore_ascii_case("conll") => {
                Self::Conllu
            }
            _ => Self::Json,
        }
    }

    pub fn parse(&self, input: &str) -> Result<ParsedDocument> {
        match self {
            Self::Json => parse_json_stream(input),
            Self::Conllu => parse_conllu(input),
        }
    }
}

/// Load a pre-parsed token stream from disk
pub fn load_token_file(path: impl AsRef<Path>) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| KnowMapError::io(path, e))?;
    let document = TokenFormat::from_path(path).parse(&content)?;

    tracing::debug!(
        path = %path.display(),
        sentences = document.sentences.len(),
        tokens = document.token_count(),
        "loaded token stream"
    );
    Ok(document)
}

/// Parse a JSON token stream
pub fn parse_json_stream(input: &str) -> Result<ParsedDocument> {
    Ok(serde_json::from_str(input)?)
}

/// Parse CoNLL-U into sentences
///
/// Multiword-token ranges (`1-2`) and empty nodes (`1.1`) are skipped.
/// A `_` lemma falls back to the surface form.
pub fn parse_conllu(input: &str) -> Result<ParsedDocument> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim_end();

        if line.is_empty() {
            if !current.is_empty() {
                sentences.push(Sentence::new(std::mem::take(&mut current)));
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 10 {
            return Err(KnowMapError::Parse {
                line: idx + 1,
                message: format!("expected 10 tab-separated columns, found {}", columns.len()),
            });
        }

        let id = columns[0];
        if id.contains('-') || id.contains('.') {
            continue;
        }

        let mut token = Token::new(columns[1], columns[3], columns[7]);
        if columns[2] != "_" {
            token = token.with_lemma(columns[2]);
        }
        current.push(token);
    }

    if !current.is_empty() {
        sentences.push(Sentence::new(current));
    }

    Ok(ParsedDocument::new(sentences))
}

// ============================================================================
// External command parser
// ============================================================================

/// Runs an external program as the dependency parser
///
/// The program receives the text on stdin and must print a JSON token stream
/// on stdout. A non-zero exit status is reported as a parser error.
#[derive(Debug, Clone)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build from a program + arguments list, as stored in configuration
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone()).with_args(args.iter().cloned()))
    }
}

impl DependencyParser for CommandParser {
    fn parse(&self, text: &str) -> Result<ParsedDocument> {
        tracing::debug!(program = %self.program, bytes = text.len(), "running external parser");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KnowMapError::Parser(format!("failed to start {}: {e}", self.program)))?;

        // parsers may write output before they finish reading input, so stdin
        // is fed from a separate thread while stdout/stderr are drained
        let writer = child.stdin.take().map(|mut stdin| {
            let input = text.to_owned();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| KnowMapError::Parser(format!("failed to read output: {e}")))?;

        let written = match writer {
            Some(handle) => handle
                .join()
                .map_err(|_| KnowMapError::Parser("stdin writer panicked".to_string()))?,
            None => Ok(()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KnowMapError::Parser(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        written.map_err(|e| KnowMapError::Parser(format!("failed to write input: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_json_stream(&stdout)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
