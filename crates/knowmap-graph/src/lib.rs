//! KnowMap Graph - Knowledge graph construction and interchange
//!
//! Builds a directed graph from extracted triples, tags every node with a
//! domain from a static lookup table, filters by domain, and reads/writes
//! node-link JSON.
//!
//! # Example
//!
//! ```
//! use knowmap_core::{DomainMap, Triple};
//! use knowmap_graph::build;
//!
//! let domains = DomainMap::new().with_entry("AI", "Technology");
//! let kg = build(&[Triple::new("AI", "improves", "healthcare")], &domains);
//!
//! assert_eq!(kg.domain("AI"), Some("Technology"));
//! assert_eq!(kg.domain("healthcare"), Some("Unknown"));
//! assert_eq!(kg.filter_by_domain("technology").node_count(), 1);
//! ```

pub mod builder;
pub mod filter;
pub mod graph;
pub mod node_link;

pub use builder::{build, BuildStats, GraphBuilder};
pub use filter::{filter, ALL_DOMAINS};
pub use graph::{EdgeView, GraphEdge, GraphNode, KnowledgeGraph};
pub use node_link::{NodeLinkEdge, NodeLinkGraph, NodeLinkNode};
