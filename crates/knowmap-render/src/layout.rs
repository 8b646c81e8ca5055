//! Force-directed layout
//!
//! Runs the `force_graph` spring/charge simulation for a fixed number of
//! steps, then fits the resulting coordinates into the configured canvas.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use knowmap_core::LayoutConfig;
use knowmap_graph::KnowledgeGraph;

/// Padding kept free around the fitted drawing; leaves room for the title
/// and for self-loops with their labels
const MARGIN: f64 = 100.0;

const NODE_MASS: f32 = 10.0;

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Node positions keyed by node label
#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: HashMap<String, Position>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn rng_for(config: &LayoutConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Compute a layout for every node of `graph`
///
/// Initial positions are random inside the canvas; with `config.seed` set the
/// result is reproducible. An empty graph yields an empty layout.
pub fn compute_layout(graph: &KnowledgeGraph, config: &LayoutConfig) -> Layout {
    let mut layout = Layout {
        positions: HashMap::with_capacity(graph.node_count()),
        width: config.width,
        height: config.height,
    };
    if graph.is_empty() {
        return layout;
    }

    let mut rng = rng_for(config);
    let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
        force_charge: config.force_charge,
        force_spring: config.force_spring,
        force_max: config.force_max,
        node_speed: config.node_speed,
        damping_factor: config.damping_factor,
    });

    let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    let mut initial = Vec::with_capacity(ids.len());
    let mut handles = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let x = rng.gen_range(0.0..config.width.max(1.0)) as f32;
        let y = rng.gen_range(0.0..config.height.max(1.0)) as f32;
        initial.push((x, y));

        let handle = sim.add_node(NodeData {
            x,
            y,
            mass: NODE_MASS,
            is_anchor: false,
            user_data: i,
        });
        handles.insert(*id, handle);
    }

    for edge in graph.edges() {
        // the simulation has no use for self-loops
        if edge.source == edge.target {
            continue;
        }
        if let (Some(&s), Some(&t)) = (handles.get(edge.source), handles.get(edge.target)) {
            sim.add_edge(s, t, EdgeData::default());
        }
    }

    for _ in 0..config.iterations {
        sim.update(config.time_step);
    }

    let mut raw = initial.clone();
    sim.visit_nodes(|node| {
        let (x, y) = (node.x(), node.y());
        if x.is_finite() && y.is_finite() {
            raw[node.data.user_data] = (x, y);
        }
    });

    let fitted = fit_to_canvas(&raw, config.width, config.height);
    for (id, pos) in ids.into_iter().zip(fitted) {
        layout.positions.insert(id.to_string(), pos);
    }

    tracing::debug!(
        nodes = layout.len(),
        iterations = config.iterations,
        seed = ?config.seed,
        "computed force-directed layout"
    );
    layout
}

/// Scale raw simulation coordinates into the canvas, preserving aspect ratio
fn fit_to_canvas(raw: &[(f32, f32)], width: f64, height: f64) -> Vec<Position> {
    let center = Position {
        x: width / 2.0,
        y: height / 2.0,
    };
    if raw.len() == 1 {
        return vec![center];
    }

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in raw {
        min_x = min_x.min(x as f64);
        min_y = min_y.min(y as f64);
        max_x = max_x.max(x as f64);
        max_y = max_y.max(y as f64);
    }

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    let avail_x = (width - 2.0 * MARGIN).max(1.0);
    let avail_y = (height - 2.0 * MARGIN).max(1.0);
    let scale = match (span_x > f64::EPSILON, span_y > f64::EPSILON) {
        (true, true) => (avail_x / span_x).min(avail_y / span_y),
        (true, false) => avail_x / span_x,
        (false, true) => avail_y / span_y,
        (false, false) => 0.0,
    };

    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;
    raw.iter()
        .map(|&(x, y)| Position {
            x: center.x + (x as f64 - mid_x) * scale,
            y: center.y + (y as f64 - mid_y) * scale,
        })
        .collect()
}
