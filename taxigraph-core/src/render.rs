// Graph to drawing primitives

use crate::layout::Layout;
use crate::model::{Graph, Node, Position};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Canvas constants and toggles for rendering a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub padding: f64,
    pub scale: f64,
    pub node_scale: f64,
    pub node_size: (f64, f64),
    pub node_font: f64,
    pub node_font_min: f64,
    pub waypoint_size: f64,
    pub waypoint_size_min: f64,
    pub waypoints: bool,
    pub direct_edges: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 500.0,
            scale: 0.25,
            node_scale: 0.75,
            node_size: (40.0, 20.0),
            node_font: 14.0,
            node_font_min: 6.0,
            waypoint_size: 5.0,
            waypoint_size_min: 1.0,
            waypoints: true,
            direct_edges: true,
        }
    }
}

impl RenderConfig {
    pub fn node_radii(&self) -> (f64, f64) {
        (
            self.node_size.0 * self.node_scale,
            self.node_size.1 * self.node_scale,
        )
    }

    pub fn font_size(&self) -> f64 {
        self.node_font_min.max(self.node_font * self.node_scale)
    }

    pub fn waypoint_radius(&self) -> f64 {
        self.waypoint_size_min
            .max(self.waypoint_size * self.node_scale)
    }

    pub fn canvas_size(&self, layout: &Layout) -> (f64, f64) {
        (
            (layout.width + self.padding * 2.0) * self.scale,
            (layout.height + self.padding * 2.0) * self.scale,
        )
    }

    /// Canvas coordinates of a point in the rendering plane.
    pub fn project(&self, layout: &Layout, position: Position) -> (f64, f64) {
        let shifted = layout.shift(position);
        (
            (shifted.x + self.padding) * self.scale,
            (shifted.y + self.padding) * self.scale,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Node {
        id: i64,
        label: String,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        font_size: f64,
        fill: &'static str,
    },
    Waypoint {
        path_id: i64,
        seq: usize,
        cx: f64,
        cy: f64,
        r: f64,
        fill: &'static str,
    },
    Link {
        from: i64,
        to: i64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: &'static str,
    },
}

impl Primitive {
    /// Element id, stable for the same source ids.
    pub fn id(&self) -> String {
        match self {
            Primitive::Node { id, .. } => format!("node{}", id),
            Primitive::Waypoint { path_id, seq, .. } => format!("edge{}_{}", path_id, seq),
            Primitive::Link { from, to, .. } => format!("link{}_{}", from, to),
        }
    }
}

/// A rendered map: canvas size and primitives in serialization order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

/// Renders a graph, or returns `None` when it has no nodes to place.
pub fn render_graph(graph: &Graph, config: &RenderConfig) -> Option<Drawing> {
    let layout = Layout::compute(&graph.nodes)?;
    Some(render(graph, &layout, config))
}

pub fn render(graph: &Graph, layout: &Layout, config: &RenderConfig) -> Drawing {
    let by_id: HashMap<i64, &Node> = graph.nodes.iter().map(|n| (n.id, n)).collect();
    let mut primitives = Vec::new();

    let (rx, ry) = config.node_radii();
    let font_size = config.font_size();
    for node in &graph.nodes {
        let (cx, cy) = config.project(layout, node.position);
        primitives.push(Primitive::Node {
            id: node.id,
            label: node.label.clone(),
            cx,
            cy,
            rx,
            ry,
            font_size,
            fill: node.color,
        });
    }

    if config.waypoints {
        let r = config.waypoint_radius();
        for run in &graph.waypoints {
            // Only routes between nodes on this canvas
            if !by_id.contains_key(&run.from) || !by_id.contains_key(&run.to) {
                continue;
            }
            for (i, waypoint) in run.waypoints.iter().enumerate() {
                let (cx, cy) = config.project(layout, waypoint.position);
                primitives.push(Primitive::Waypoint {
                    path_id: run.path_id,
                    seq: i + 1,
                    cx,
                    cy,
                    r,
                    fill: waypoint.color,
                });
            }
        }
    }

    if config.direct_edges {
        for direct in graph.direct_edges() {
            let (Some(source), Some(destination)) = (by_id.get(&direct.from), by_id.get(&direct.to))
            else {
                continue;
            };
            let (x1, y1) = config.project(layout, destination.position);
            let (x2, y2) = config.project(layout, source.position);
            primitives.push(Primitive::Link {
                from: direct.from,
                to: direct.to,
                x1,
                y1,
                x2,
                y2,
                stroke: direct.color,
            });
        }
    }

    // Nodes were pushed first and must end up drawn on top
    primitives.reverse();

    let (width, height) = config.canvas_size(layout);
    debug!(
        "Rendered {} primitives on a {}x{} canvas",
        primitives.len(),
        width,
        height
    );

    Drawing {
        width,
        height,
        primitives,
    }
}
