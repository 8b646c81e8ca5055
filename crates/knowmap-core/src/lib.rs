//! KnowMap Core - Domain models, errors, and shared configuration
//!
//! This crate defines the core abstractions used throughout KnowMap:
//! - Knowledge triples (subject, relation, object)
//! - Domain lookup table and the set of known domains
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    ConfigError, KnowMapConfig, LayoutConfig, LoggingConfig, OutputConfig, ParserConfig,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Domain assigned to entities missing from the lookup table
pub const UNKNOWN_DOMAIN: &str = "Unknown";

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for KnowMap operations
#[derive(Error, Debug)]
pub enum KnowMapError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Dependency parser error: {0}")]
    Parser(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid graph document: {0}")]
    InvalidGraph(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KnowMapError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, KnowMapError>;

// ============================================================================
// Triples
// ============================================================================

/// A relationship triple (Subject, Relation, Object)
///
/// Serializes as the relation record `{"subject", "relation", "object"}`,
/// which is also the shape of pre-extracted relation files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject entity surface text
    pub subject: String,

    /// Relation (usually the verb)
    pub relation: String,

    /// Object entity surface text
    pub object: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }
}

impl<S, R, O> From<(S, R, O)> for Triple
where
    S: Into<String>,
    R: Into<String>,
    O: Into<String>,
{
    fn from((subject, relation, object): (S, R, O)) -> Self {
        Self::new(subject, relation, object)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.relation, self.object)
    }
}

/// Load a JSON array of relation records from disk
pub fn load_relation_records(path: impl AsRef<Path>) -> Result<Vec<Triple>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| KnowMapError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Write relation records as a pretty-printed JSON array
pub fn save_relation_records(path: impl AsRef<Path>, triples: &[Triple]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(triples)?;
    std::fs::write(path, json).map_err(|e| KnowMapError::io(path, e))
}

// ============================================================================
// Domains
// ============================================================================

/// Domains with a dedicated presentation in the renderers
///
/// Any other domain label (including [`UNKNOWN_DOMAIN`]) is still a valid
/// node domain; it simply has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownDomain {
    Technology,
    Medical,
    Organization,
}

impl KnownDomain {
    /// All known domains in display order
    pub const ALL: [KnownDomain; 3] = [Self::Technology, Self::Medical, Self::Organization];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Medical => "Medical",
            Self::Organization => "Organization",
        }
    }

    /// Resolve a domain label; matching is exact (case-sensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Technology" => Some(Self::Technology),
            "Medical" => Some(Self::Medical),
            "Organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

impl std::fmt::Display for KnownDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static entity -> domain lookup table
///
/// Entity strings are matched exactly: "Google" and "google" are different
/// keys. Entities absent from the table resolve to [`UNKNOWN_DOMAIN`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainMap {
    entries: HashMap<String, String>,
}

impl DomainMap {
    /// Create an empty lookup table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, entity: impl Into<String>, domain: impl Into<String>) {
        self.entries.insert(entity.into(), domain.into());
    }

    /// Builder-style insert
    pub fn with_entry(mut self, entity: impl Into<String>, domain: impl Into<String>) -> Self {
        self.insert(entity, domain);
        self
    }

    /// Domain of an entity, defaulting to "Unknown"
    pub fn lookup(&self, entity: &str) -> &str {
        self.entries
            .get(entity)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_DOMAIN)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another table into this one; entries from `other` win
    pub fn extend(&mut self, other: DomainMap) {
        self.entries.extend(other.entries);
    }
}

impl<K, V> FromIterator<(K, V)> for DomainMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
