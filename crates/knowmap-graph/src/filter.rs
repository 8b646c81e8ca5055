//! Domain filter: induced subgraphs by node domain

use crate::graph::KnowledgeGraph;

/// Selector that keeps the whole graph
pub const ALL_DOMAINS: &str = "all";

impl KnowledgeGraph {
    /// Induced subgraph of nodes whose domain matches `selected_domain`
    ///
    /// Matching is case-insensitive. `"all"` (any case) returns a copy of
    /// the whole graph. An edge survives iff both endpoints survive. The
    /// result is always a detached copy; a domain with no matching nodes
    /// yields an empty graph.
    pub fn filter_by_domain(&self, selected_domain: &str) -> KnowledgeGraph {
        let selected = selected_domain.to_lowercase();
        if selected == ALL_DOMAINS {
            return self.clone();
        }

        let subgraph = self.petgraph().filter_map(
            |_, node| (node.domain.to_lowercase() == selected).then(|| node.clone()),
            |_, edge| Some(edge.clone()),
        );
        let filtered = KnowledgeGraph::from_petgraph(subgraph);

        tracing::debug!(
            domain = %selected_domain,
            nodes = filtered.node_count(),
            edges = filtered.edge_count(),
            "filtered graph by domain"
        );
        filtered
    }
}

/// Free-function form of [`KnowledgeGraph::filter_by_domain`]
pub fn filter(graph: &KnowledgeGraph, selected_domain: &str) -> KnowledgeGraph {
    graph.filter_by_domain(selected_domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use knowmap_core::{DomainMap, Triple};

    fn example() -> KnowledgeGraph {
        let domains: DomainMap = [("A", "Tech"), ("B", "Tech"), ("C", "Med")]
            .into_iter()
            .collect();
        build(
            &[
                Triple::new("A", "improves", "B"),
                Triple::new("B", "supports", "C"),
            ],
            &domains,
        )
    }

    #[test]
    fn test_filter_example() {
        let kg = example();
        let tech = filter(&kg, "Tech");

        assert_eq!(tech.node_count(), 2);
        assert!(tech.contains_node("A"));
        assert!(tech.contains_node("B"));
        assert!(!tech.contains_node("C"));
        assert_eq!(tech.edge_count(), 1);
        assert_eq!(tech.relation("A", "B"), Some("improves"));
    }

    #[test]
    fn test_filter_case_insensitive() {
        let kg = example();
        assert_eq!(filter(&kg, "tECH"), filter(&kg, "Tech"));
        assert_eq!(filter(&kg, "med").node_count(), 1);
    }

    #[test]
    fn test_filter_all_is_detached_copy() {
        let kg = example();
        let mut copy = filter(&kg, "ALL");
        assert_eq!(copy, kg);

        copy.upsert_edge("C", "A", "cites");
        copy.upsert_node("A", "Med");
        assert_eq!(kg.edge_count(), 2);
        assert_eq!(kg.domain("A"), Some("Tech"));
        assert_ne!(copy, kg);
    }

    #[test]
    fn test_filtered_graph_is_detached() {
        let kg = example();
        let mut tech = filter(&kg, "Tech");
        tech.upsert_edge("B", "A", "feeds");

        assert!(!kg.contains_edge("B", "A"));
        assert!(tech.contains_edge("B", "A"));
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let kg = example();
        let none = filter(&kg, "Organization");

        assert!(none.is_empty());
        assert_eq!(none.edge_count(), 0);
    }

    #[test]
    fn test_filter_keeps_self_loop() {
        let mut kg = example();
        kg.upsert_edge("C", "C", "refines");

        let med = filter(&kg, "Med");
        assert_eq!(med.edge_count(), 1);
        assert_eq!(med.relation("C", "C"), Some("refines"));
    }
}
