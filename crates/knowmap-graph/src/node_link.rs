//! Node-link JSON interchange
//!
//! The document layout matches the node-link format used by D3-style
//! visualization clients:
//!
//! ```json
//! { "directed": true, "multigraph": false, "graph": {},
//!   "nodes": [{"id": "AI", "domain": "Technology"}],
//!   "links": [{"source": "AI", "target": "Healthcare", "relation": "improves"}] }
//! ```
//!
//! Import also accepts `edges` in place of `links`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use knowmap_core::{KnowMapError, Result, UNKNOWN_DOMAIN};

use crate::graph::KnowledgeGraph;

fn unknown_domain() -> String {
    UNKNOWN_DOMAIN.to_string()
}

/// A node entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub id: String,
    #[serde(default = "unknown_domain")]
    pub domain: String,
}

/// A link entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relation: String,
}

/// A complete node-link document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    /// Graph-level attributes (always empty on export)
    #[serde(default)]
    pub graph: serde_json::Map<String, serde_json::Value>,
    pub nodes: Vec<NodeLinkNode>,
    #[serde(alias = "edges")]
    pub links: Vec<NodeLinkEdge>,
}

impl From<&KnowledgeGraph> for NodeLinkGraph {
    fn from(kg: &KnowledgeGraph) -> Self {
        Self {
            directed: true,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes: kg
                .nodes()
                .map(|n| NodeLinkNode {
                    id: n.id.clone(),
                    domain: n.domain.clone(),
                })
                .collect(),
            links: kg
                .edges()
                .map(|e| NodeLinkEdge {
                    source: e.source.to_string(),
                    target: e.target.to_string(),
                    relation: e.relation.to_string(),
                })
                .collect(),
        }
    }
}

impl TryFrom<NodeLinkGraph> for KnowledgeGraph {
    type Error = KnowMapError;

    fn try_from(doc: NodeLinkGraph) -> Result<Self> {
        if !doc.directed {
            return Err(KnowMapError::InvalidGraph(
                "undirected graphs are not supported".to_string(),
            ));
        }
        if doc.multigraph {
            return Err(KnowMapError::InvalidGraph(
                "multigraphs are not supported".to_string(),
            ));
        }

        let mut kg = KnowledgeGraph::new();
        for node in &doc.nodes {
            kg.upsert_node(&node.id, &node.domain);
        }
        for link in &doc.links {
            kg.upsert_edge(&link.source, &link.target, &link.relation);
        }
        Ok(kg)
    }
}

impl KnowledgeGraph {
    /// Node-link document for this graph
    pub fn to_node_link(&self) -> NodeLinkGraph {
        NodeLinkGraph::from(self)
    }

    /// Pretty-printed node-link JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_node_link())?)
    }

    /// Parse node-link JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: NodeLinkGraph = serde_json::from_str(json)?;
        KnowledgeGraph::try_from(doc)
    }

    /// Write node-link JSON to a file
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?).map_err(|e| KnowMapError::io(path, e))?;

        tracing::info!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "exported node-link JSON"
        );
        Ok(())
    }

    /// Read node-link JSON from a file
    pub fn import_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| KnowMapError::io(path, e))?;
        Self::from_json_str(&content)
    }
}
