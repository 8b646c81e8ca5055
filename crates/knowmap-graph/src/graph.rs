//! Directed knowledge graph backed by petgraph
//!
//! Nodes are unique by label and carry a `domain`; edges are unique by
//! ordered (source, target) pair and carry a `relation`. Re-declaring a node
//! or an edge overwrites its attribute (last write wins).

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use knowmap_core::UNKNOWN_DOMAIN;

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Entity surface text (node identity)
    pub id: String,
    /// Domain label
    pub domain: String,
}

/// Edge payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub relation: String,
}

/// Borrowed view of an edge with resolved endpoint labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub relation: &'a str,
}

/// A directed knowledge graph
///
/// Iteration over nodes and edges follows first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    node_index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a petgraph graph, rebuilding the label index
    pub(crate) fn from_petgraph(graph: DiGraph<GraphNode, GraphEdge>) -> Self {
        let node_index = graph
            .node_indices()
            .map(|idx| (graph[idx].id.clone(), idx))
            .collect();
        Self { graph, node_index }
    }

    pub(crate) fn petgraph(&self) -> &DiGraph<GraphNode, GraphEdge> {
        &self.graph
    }

    /// Insert a node or overwrite its domain
    ///
    /// Returns the previous domain when the node already existed.
    pub fn upsert_node(&mut self, id: &str, domain: &str) -> Option<String> {
        if let Some(&idx) = self.node_index.get(id) {
            let node = &mut self.graph[idx];
            return Some(std::mem::replace(&mut node.domain, domain.to_string()));
        }

        let idx = self.graph.add_node(GraphNode {
            id: id.to_string(),
            domain: domain.to_string(),
        });
        self.node_index.insert(id.to_string(), idx);
        None
    }

    /// Insert a directed edge or overwrite its relation
    ///
    /// Missing endpoints are created with the "Unknown" domain. Returns the
    /// previous relation when the edge already existed.
    pub fn upsert_edge(&mut self, source: &str, target: &str, relation: &str) -> Option<String> {
        let s = self.ensure_node(source);
        let t = self.ensure_node(target);

        if let Some(edge) = self.graph.find_edge(s, t) {
            let weight = &mut self.graph[edge];
            return Some(std::mem::replace(
                &mut weight.relation,
                relation.to_string(),
            ));
        }

        self.graph.add_edge(
            s,
            t,
            GraphEdge {
                relation: relation.to_string(),
            },
        );
        None
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        self.upsert_node(id, UNKNOWN_DOMAIN);
        self.node_index[id]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Domain attribute of a node
    pub fn domain(&self, id: &str) -> Option<&str> {
        self.node(id).map(|n| n.domain.as_str())
    }

    /// Relation attribute of the edge source -> target
    pub fn relation(&self, source: &str, target: &str) -> Option<&str> {
        let s = *self.node_index.get(source)?;
        let t = *self.node_index.get(target)?;
        let edge = self.graph.find_edge(s, t)?;
        Some(self.graph[edge].relation.as_str())
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.relation(source, target).is_some()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(move |edge| EdgeView {
            source: &self.graph[edge.source()].id,
            target: &self.graph[edge.target()].id,
            relation: &edge.weight().relation,
        })
    }

    /// Distinct node domains in first-seen order
    pub fn domains(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes()
            .map(|n| n.domain.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }
}

/// Value equality: same node domains and same edge relations, in any order
impl PartialEq for KnowledgeGraph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self
                .nodes()
                .all(|n| other.domain(&n.id) == Some(n.domain.as_str()))
            && self
                .edges()
                .all(|e| other.relation(e.source, e.target) == Some(e.relation))
    }
}

impl Eq for KnowledgeGraph {}
