//! Graph Builder module
//!
//! Applies triples, in order, to a [`KnowledgeGraph`]: each triple upserts
//! its subject and object nodes (domain from the lookup table) and then
//! upserts the subject -> object edge. Because both upserts overwrite,
//! the last triple touching a node or an edge decides its attribute.

use knowmap_core::{DomainMap, Triple};

use crate::graph::KnowledgeGraph;

// ============================================================================
// Build statistics
// ============================================================================

/// Summary of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of triples applied
    pub triples_applied: usize,
    /// Node re-declarations that changed the domain
    pub domains_overwritten: usize,
    /// Edge re-declarations that changed the relation
    pub relations_overwritten: usize,
}

// ============================================================================
// Graph Builder
// ============================================================================

/// Ordered-apply reducer from triples to a graph
pub struct GraphBuilder<'a> {
    /// Read-only domain lookup
    domains: &'a DomainMap,
    graph: KnowledgeGraph,
    stats: BuildStats,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over an empty graph
    pub fn new(domains: &'a DomainMap) -> Self {
        Self {
            domains,
            graph: KnowledgeGraph::new(),
            stats: BuildStats::default(),
        }
    }

    /// Apply one triple
    pub fn add_triple(&mut self, triple: &Triple) {
        self.declare_node(&triple.subject);
        self.declare_node(&triple.object);

        if let Some(previous) =
            self.graph
                .upsert_edge(&triple.subject, &triple.object, &triple.relation)
        {
            if previous != triple.relation {
                tracing::debug!(
                    source = %triple.subject,
                    target = %triple.object,
                    from = %previous,
                    to = %triple.relation,
                    "edge relation overwritten"
                );
                self.stats.relations_overwritten += 1;
            }
        }

        self.stats.triples_applied += 1;
    }

    fn declare_node(&mut self, id: &str) {
        let domain = self.domains.lookup(id);
        if let Some(previous) = self.graph.upsert_node(id, domain) {
            if previous != domain {
                tracing::debug!(node = %id, from = %previous, to = %domain, "node domain overwritten");
                self.stats.domains_overwritten += 1;
            }
        }
    }

    /// Apply triples in order
    pub fn extend<'t, I>(&mut self, triples: I)
    where
        I: IntoIterator<Item = &'t Triple>,
    {
        for triple in triples {
            self.add_triple(triple);
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Finish and take the graph
    pub fn finish(self) -> KnowledgeGraph {
        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            triples = self.stats.triples_applied,
            "graph built"
        );
        self.graph
    }
}

/// Build a graph from triples and a domain lookup table
pub fn build(triples: &[Triple], domains: &DomainMap) -> KnowledgeGraph {
    let mut builder = GraphBuilder::new(domains);
    builder.extend(triples);
    builder.finish()
}

// ============================================================================
// Tests
// ============================================================================
