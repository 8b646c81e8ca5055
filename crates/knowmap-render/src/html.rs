//! Interactive HTML rendering
//!
//! Produces a single self-contained page that loads vis-network from a CDN
//! and inlines the graph data. Physics uses the Barnes-Hut solver; hover,
//! keyboard navigation and the navigation buttons are enabled.

use std::path::Path;

use serde::Serialize;

use knowmap_core::{KnowMapError, KnownDomain, Result};
use knowmap_graph::KnowledgeGraph;

const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

const CANVAS_HEIGHT: &str = "600px";
const CANVAS_WIDTH: &str = "100%";

/// Node color for a domain label
///
/// Technology, Medical and Organization have dedicated colors; every other
/// label, "Unknown" included, is gray. Matching is case-sensitive.
pub fn domain_color(domain: &str) -> &'static str {
    match KnownDomain::from_label(domain) {
        Some(KnownDomain::Technology) => "blue",
        Some(KnownDomain::Medical) => "red",
        Some(KnownDomain::Organization) => "green",
        None => "gray",
    }
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    color: &'static str,
    title: String,
}

#[derive(Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    label: &'a str,
    arrows: &'static str,
}

fn network_options() -> serde_json::Value {
    serde_json::json!({
        "interaction": {
            "hover": true,
            "navigationButtons": true,
            "keyboard": true
        },
        "physics": {
            "enabled": true,
            "solver": "barnesHut",
            "barnesHut": {
                "gravitationalConstant": -80000,
                "centralGravity": 0.3,
                "springLength": 250,
                "springConstant": 0.001,
                "damping": 0.09,
                "avoidOverlap": 0
            }
        },
        "edges": {
            "font": { "align": "middle" },
            "smooth": { "type": "dynamic" }
        }
    })
}

/// Serialize a value for inlining in a `<script>` block
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Render the interactive page for `graph`
pub fn render_html(graph: &KnowledgeGraph) -> Result<String> {
    let nodes: Vec<VisNode<'_>> = graph
        .nodes()
        .map(|n| VisNode {
            id: &n.id,
            label: &n.id,
            color: domain_color(&n.domain),
            title: format!("Domain: {}", n.domain),
        })
        .collect();
    let edges: Vec<VisEdge<'_>> = graph
        .edges()
        .map(|e| VisEdge {
            from: e.source,
            to: e.target,
            label: e.relation,
            arrows: "to",
        })
        .collect();

    let nodes = script_json(&nodes)?;
    let edges = script_json(&edges)?;
    let options = script_json(&network_options())?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Cross-Domain Knowledge Map</title>
<script type="text/javascript" src="{VIS_NETWORK_JS}"></script>
<style type="text/css">
  #knowmap-network {{
    width: {CANVAS_WIDTH};
    height: {CANVAS_HEIGHT};
    background-color: #ffffff;
    border: 1px solid lightgray;
    position: relative;
  }}
</style>
</head>
<body>
<div id="knowmap-network"></div>
<script type="text/javascript">
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var container = document.getElementById("knowmap-network");
  var data = {{ nodes: nodes, edges: edges }};
  var options = {options};
  var network = new vis.Network(container, data, options);
</script>
</body>
</html>
"#
    ))
}

/// Write the interactive page to `path`
pub fn write_html(graph: &KnowledgeGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let page = render_html(graph)?;
    std::fs::write(path, page).map_err(|e| KnowMapError::io(path, e))?;

    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "wrote interactive graph"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeGraph {
        let mut kg = KnowledgeGraph::new();
        kg.upsert_node("Google", "Organization");
        kg.upsert_node("Artificial Intelligence", "Technology");
        kg.upsert_node("Healthcare", "Medical");
        kg.upsert_node("Mystery", "Unknown");
        kg.upsert_edge("Google", "Artificial Intelligence", "invests_in");
        kg.upsert_edge("Artificial Intelligence", "Healthcare", "improves");
        kg
    }

    #[test]
    fn test_domain_colors() {
        assert_eq!(domain_color("Technology"), "blue");
        assert_eq!(domain_color("Medical"), "red");
        assert_eq!(domain_color("Organization"), "green");
        assert_eq!(domain_color("Unknown"), "gray");
        assert_eq!(domain_color("technology"), "gray");
        assert_eq!(domain_color(""), "gray");
    }

    #[test]
    fn test_render_contains_nodes_and_edges() {
        let page = render_html(&sample()).unwrap();

        assert!(page.contains(VIS_NETWORK_JS));
        assert!(page.contains(r#""title":"Domain: Organization""#));
        assert!(page.contains(r#""color":"gray""#));
        assert!(page.contains(r#""from":"Google","to":"Artificial Intelligence","label":"invests_in""#));
        assert!(page.contains(r#""navigationButtons":true"#));
        assert!(page.contains(r#""solver":"barnesHut""#));
    }

    #[test]
    fn test_script_breakout_escaped() {
        let mut kg = KnowledgeGraph::new();
        kg.upsert_node("</script><b>", "Technology");

        let page = render_html(&kg).unwrap();
        assert!(!page.contains("</script><b>"));
        assert!(page.contains(r"<\/script><b>"));
    }

    #[test]
    fn test_empty_graph_renders() {
        let page = render_html(&KnowledgeGraph::new()).unwrap();
        assert!(page.contains("new vis.DataSet([])"));
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.html");

        write_html(&sample(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_write_html_bad_path() {
        let err = write_html(&sample(), "/nonexistent-dir/graph.html").unwrap_err();
        assert!(matches!(err, KnowMapError::Io { .. }));
    }
}
