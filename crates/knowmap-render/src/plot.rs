//! Static plot rendering
//!
//! Draws the force-directed layout as an SVG figure: titled canvas, gray
//! directed edges with red relation labels, sky-blue nodes with bold labels.

use std::fmt::Write as _;
use std::path::Path;

use knowmap_core::{KnowMapError, LayoutConfig, Result};
use knowmap_graph::KnowledgeGraph;

use crate::layout::{compute_layout, Position};

const TITLE: &str = "Cross-Domain Knowledge Map";
const NODE_RADIUS: f64 = 28.0;
const NODE_FILL: &str = "skyblue";
const EDGE_STROKE: &str = "gray";
const EDGE_LABEL_FILL: &str = "red";
const SELF_LOOP_RADIUS: f64 = 18.0;
const EDGE_LABEL_SIZE: f64 = 11.0;
/// Vertical band reserved for the title
const TITLE_BAND: f64 = 40.0;

/// Escape text for SVG character data and attribute values
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `graph` as an SVG document
pub fn render_svg(graph: &KnowledgeGraph, config: &LayoutConfig) -> Result<String> {
    let layout = compute_layout(graph, config);
    let (width, height) = (layout.width, layout.height);

    let mut svg = String::new();
    write_svg_body(&mut svg, graph, |id| layout.position(id), width, height)
        .map_err(|e| KnowMapError::Render(e.to_string()))?;
    Ok(svg)
}

/// Loop center and label baseline for a self-loop on a node at `node_y`
///
/// The loop sits above the node unless its label would reach into the title
/// band, in which case it hangs below. The label always stays on the canvas.
fn self_loop_geometry(node_y: f64, height: f64) -> (f64, f64) {
    let above_cy = node_y - NODE_RADIUS - SELF_LOOP_RADIUS;
    let above_label = above_cy - SELF_LOOP_RADIUS - 4.0;

    let (cy, label_y) = if above_label - EDGE_LABEL_SIZE >= TITLE_BAND {
        (above_cy, above_label)
    } else {
        let below_cy = node_y + NODE_RADIUS + SELF_LOOP_RADIUS;
        (below_cy, below_cy + SELF_LOOP_RADIUS + EDGE_LABEL_SIZE + 2.0)
    };
    (cy, label_y.clamp(EDGE_LABEL_SIZE, (height - 2.0).max(EDGE_LABEL_SIZE)))
}

fn write_svg_body(
    svg: &mut String,
    graph: &KnowledgeGraph,
    position: impl Fn(&str) -> Option<Position>,
    width: f64,
    height: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    )?;
    writeln!(
        svg,
        r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{EDGE_STROKE}"/></marker></defs>"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="15">{}</text>"#,
        width / 2.0,
        TITLE
    )?;

    writeln!(svg, r#"<g class="edges">"#)?;
    for edge in graph.edges() {
        let (Some(s), Some(t)) = (position(edge.source), position(edge.target)) else {
            continue;
        };
        let label = escape(edge.relation);

        if edge.source == edge.target {
            let (cy, label_y) = self_loop_geometry(s.y, height);
            writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{SELF_LOOP_RADIUS}" fill="none" stroke="{EDGE_STROKE}" stroke-width="2"/>"#,
                s.x, cy
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{EDGE_LABEL_SIZE}" fill="{EDGE_LABEL_FILL}">{label}</text>"#,
                s.x, label_y
            )?;
            continue;
        }

        let (dx, dy) = (t.x - s.x, t.y - s.y);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= f64::EPSILON {
            continue;
        }
        // keep the line outside the node circles unless they overlap
        let inset = if dist > 2.0 * NODE_RADIUS { NODE_RADIUS } else { 0.0 };
        let (ux, uy) = (dx / dist * inset, dy / dist * inset);
        writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{EDGE_STROKE}" stroke-width="2" marker-end="url(#arrow)"/>"#,
            s.x + ux,
            s.y + uy,
            t.x - ux,
            t.y - uy
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{EDGE_LABEL_SIZE}" fill="{EDGE_LABEL_FILL}">{label}</text>"#,
            (s.x + t.x) / 2.0,
            (s.y + t.y) / 2.0
        )?;
    }
    writeln!(svg, "</g>")?;

    writeln!(svg, r#"<g class="nodes">"#)?;
    for node in graph.nodes() {
        let Some(p) = position(&node.id) else {
            continue;
        };
        let id = escape(&node.id);
        writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="{NODE_RADIUS}" fill="{NODE_FILL}" stroke="{NODE_FILL}" stroke-width="2"><title>{id}</title></circle>"#,
            p.x, p.y
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" font-size="12" font-weight="bold">{id}</text>"#,
            p.x, p.y
        )?;
    }
    writeln!(svg, "</g>")?;
    writeln!(svg, "</svg>")
}

/// Render `graph` and write the SVG figure to `path`
pub fn write_svg(
    graph: &KnowledgeGraph,
    config: &LayoutConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let svg = render_svg(graph, config)?;
    std::fs::write(path, svg).map_err(|e| KnowMapError::io(path, e))?;

    tracing::info!(path = %path.display(), nodes = graph.node_count(), "wrote static plot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig {
            seed: Some(42),
            iterations: 30,
            ..LayoutConfig::default()
        }
    }

    fn sample() -> KnowledgeGraph {
        let mut kg = KnowledgeGraph::new();
        kg.upsert_edge("Neural Networks", "Cancer Detection", "used_in");
        kg.upsert_edge("R&D", "Neural Networks", "funds");
        kg
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_svg_contains_labels() {
        let svg = render_svg(&sample(), &config()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(TITLE));
        assert!(svg.contains(">Neural Networks</text>"));
        assert!(svg.contains(">used_in</text>"));
        assert!(svg.contains(">R&amp;D</text>"));
        assert_eq!(svg.matches(r#"marker-end="url(#arrow)""#).count(), 2);
    }

    #[test]
    fn test_self_loop_drawn() {
        let mut kg = KnowledgeGraph::new();
        kg.upsert_edge("AI", "AI", "improves");

        let svg = render_svg(&kg, &config()).unwrap();
        assert!(svg.contains(">improves</text>"));
        assert!(!svg.contains("marker-end"));
    }

    fn text_baselines(svg: &str) -> Vec<f64> {
        svg.lines()
            .filter(|l| l.starts_with("<text"))
            .filter_map(|l| {
                let rest = l.split(" y=\"").nth(1)?;
                rest.split('"').next()?.parse().ok()
            })
            .collect()
    }

    #[test]
    fn test_self_loop_labels_stay_on_canvas() {
        let mut kg = KnowledgeGraph::new();
        kg.upsert_edge("A", "B", "links");
        kg.upsert_edge("A", "A", "loops");

        for seed in 0..40 {
            let config = LayoutConfig {
                seed: Some(seed),
                iterations: 30,
                ..LayoutConfig::default()
            };
            let svg = render_svg(&kg, &config).unwrap();
            let baselines = text_baselines(&svg);

            assert_eq!(baselines.len(), 5, "seed {seed}");
            for y in baselines {
                assert!(y > 0.0 && y < config.height, "seed {seed}: text at y={y}");
            }
        }
    }

    #[test]
    fn test_self_loop_flips_below_near_title() {
        let (cy, label_y) = self_loop_geometry(60.0, 600.0);
        assert!(cy > 60.0);
        assert!(label_y > cy);

        let (cy, label_y) = self_loop_geometry(300.0, 600.0);
        assert!(cy < 300.0);
        assert!(label_y < cy && label_y - EDGE_LABEL_SIZE >= TITLE_BAND);
    }

    #[test]
    fn test_empty_graph_is_valid_figure() {
        let svg = render_svg(&KnowledgeGraph::new(), &config()).unwrap();

        assert!(svg.contains(TITLE));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_seeded_output_is_stable() {
        let a = render_svg(&sample(), &config()).unwrap();
        let b = render_svg(&sample(), &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.svg");

        write_svg(&sample(), &config(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}
