//! Console listing and artifact output shared by the subcommands

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use knowmap_core::{KnowMapConfig, KnownDomain};
use knowmap_extractor::PipelineOutput;
use knowmap_graph::KnowledgeGraph;

pub const NO_RELATIONS: &str = "No relations found to generate graph.";

/// What to produce for a graph
#[derive(Debug, Clone, Copy, Default)]
pub struct Outputs {
    pub html: bool,
    pub json: bool,
    pub plot: bool,
    pub open: bool,
}

/// Node and edge listing
pub fn graph_listing(graph: &KnowledgeGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nodes in Graph:");
    for node in graph.nodes() {
        let _ = writeln!(out, "  {} (domain: {})", node.id, node.domain);
    }
    let _ = writeln!(out, "\nEdges in Graph:");
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "  {} -> {} (relation: {})",
            edge.source, edge.target, edge.relation
        );
    }
    out
}

/// Known domains first, then any other domain present in the graph, then "All"
pub fn available_domains(graph: &KnowledgeGraph) -> Vec<String> {
    let mut domains: Vec<String> = KnownDomain::ALL
        .iter()
        .map(|d| d.as_str().to_string())
        .collect();
    for domain in graph.domains() {
        if !domains.iter().any(|d| d == domain) {
            domains.push(domain.to_string());
        }
    }
    domains.push("All".to_string());
    domains
}

/// Pipeline report: cleaned sentences, entities, relations
pub fn pipeline_report(output: &PipelineOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Cleaned Sentences (Preprocessing) ---");
    for sentence in &output.cleaned_sentences {
        let _ = writeln!(out, "  {sentence}");
    }
    let _ = writeln!(out, "\n--- Named Entities (NER) ---");
    for entity in &output.entities {
        let _ = writeln!(out, "  {entity}");
    }
    let _ = writeln!(out, "\n--- Extracted Relations (Triples) ---");
    for triple in &output.relations {
        let _ = writeln!(out, "  {triple}");
    }
    out
}

fn open_or_warn(path: &Path) {
    if let Err(e) = knowmap_render::open_path(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not open viewer");
    }
}

/// Write the requested artifacts for `graph`
pub fn write_outputs(
    graph: &KnowledgeGraph,
    config: &KnowMapConfig,
    outputs: Outputs,
) -> anyhow::Result<()> {
    let paths = &config.output;

    if outputs.html {
        knowmap_render::write_html(graph, &paths.html_path)
            .with_context(|| format!("writing {}", paths.html_path.display()))?;
        println!("Interactive graph written to {}", paths.html_path.display());
        if outputs.open {
            open_or_warn(&paths.html_path);
        }
    }

    if outputs.json {
        graph
            .export_json(&paths.json_path)
            .with_context(|| format!("writing {}", paths.json_path.display()))?;
        println!("Graph exported as {}", paths.json_path.display());
    }

    if outputs.plot {
        knowmap_render::write_svg(graph, &config.layout, &paths.plot_path)
            .with_context(|| format!("writing {}", paths.plot_path.display()))?;
        println!("Static plot written to {}", paths.plot_path.display());
        if outputs.open {
            open_or_warn(&paths.plot_path);
        }
    }

    Ok(())
}
