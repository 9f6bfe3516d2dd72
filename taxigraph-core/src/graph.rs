// Taxi graph reconstruction from the loaded tables

use crate::model::{DirectEdge, Edge, Graph, Node, Position, Waypoint, WaypointRun};
use crate::table::{Record, TAXI_NODES, TAXI_PATH, TAXI_PATH_NODE, TableRegistry};
use crate::transform::CoordinateTransformer;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Edge colors, handed out round-robin in edge order.
pub const EDGE_PALETTE: &[&str] = &[
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45",
    "#469990", "#9a6324", "#800000", "#808000", "#000075", "#e6beff", "#ffd8b1", "#aaffc3",
];

/// Node fill per flag mask, checked in order. `0x3` must precede its
/// subsets and `0x0` always matches.
pub const NODE_STYLES: &[(i64, &str)] = &[
    (0x3, "#9c9"), // both factions
    (0x2, "#f66"), // horde
    (0x1, "#69f"), // alliance
    (0x0, "#ccc"),
];

pub fn edge_color(index: usize) -> &'static str {
    EDGE_PALETTE[index % EDGE_PALETTE.len()]
}

pub fn node_color(flags: i64) -> &'static str {
    NODE_STYLES
        .iter()
        .find(|(mask, _)| flags & mask == *mask)
        .map(|(_, color)| *color)
        .unwrap_or("#ccc")
}

/// The parameters a graph is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphView {
    pub map: Option<i64>,
    pub waypoints: bool,
    pub direct_edges: bool,
}

impl Default for GraphView {
    fn default() -> Self {
        Self {
            map: None,
            waypoints: true,
            direct_edges: true,
        }
    }
}

impl GraphView {
    pub fn for_map(map: i64) -> Self {
        Self {
            map: Some(map),
            ..Self::default()
        }
    }

    pub fn with_waypoints(mut self, enabled: bool) -> Self {
        self.waypoints = enabled;
        self
    }

    pub fn with_direct_edges(mut self, enabled: bool) -> Self {
        self.direct_edges = enabled;
        self
    }

    fn accepts(&self, map: i64) -> bool {
        self.map.is_none_or(|filter| filter == map)
    }
}

/// Builds graphs from a table registry, memoizing one graph per view.
pub struct GraphBuilder<'a> {
    tables: &'a TableRegistry,
    transformer: CoordinateTransformer,
    cache: HashMap<GraphView, Graph>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(tables: &'a TableRegistry) -> Self {
        Self {
            tables,
            transformer: CoordinateTransformer::new(),
            cache: HashMap::new(),
        }
    }

    pub fn build(&mut self, view: GraphView) -> &Graph {
        if !self.cache.contains_key(&view) {
            let graph = self.assemble(view);
            self.cache.insert(view, graph);
        }
        &self.cache[&view]
    }

    /// Map ids of nodes with at least one incident edge, ascending.
    pub fn maps(&self) -> Vec<i64> {
        let (_, connected) = self.collect_edges();
        let maps: BTreeSet<i64> = self
            .tables
            .records(TAXI_NODES)
            .filter(|node| connected.contains(&node.i64("ID")))
            .map(|node| node.i64("ContinentID"))
            .collect();
        maps.into_iter().collect()
    }

    pub fn unknown_maps(&self) -> Vec<i64> {
        self.transformer.unknown_maps()
    }

    fn assemble(&mut self, view: GraphView) -> Graph {
        let (edges, connected) = self.collect_edges();
        let nodes = self.collect_nodes(&connected, view);

        let waypoints = if view.waypoints {
            self.collect_waypoints(&edges, view)
        } else {
            Vec::new()
        };

        let direct = if view.direct_edges {
            collect_direct(&edges, &nodes)
        } else {
            IndexMap::new()
        };

        info!(
            "Built graph for {}: {} nodes, {} edges, {} waypoint runs",
            view.map
                .map(|m| format!("map {}", m))
                .unwrap_or_else(|| "all maps".to_string()),
            nodes.len(),
            edges.len(),
            waypoints.len()
        );

        Graph {
            edges,
            nodes,
            waypoints,
            direct,
        }
    }

    fn collect_edges(&self) -> (Vec<Edge>, HashSet<i64>) {
        let mut edges = Vec::new();
        let mut connected = HashSet::new();

        for path in self.tables.records(TAXI_PATH) {
            let from = path.i64("FromTaxiNode");
            let to = path.i64("ToTaxiNode");
            if from == 0 || to == 0 || from == to {
                continue;
            }

            connected.insert(from);
            connected.insert(to);

            edges.push(Edge {
                id: path.i64("ID"),
                from,
                to,
                cost: path.i64("Cost"),
                color: edge_color(edges.len()),
            });
        }

        (edges, connected)
    }

    fn collect_nodes(&mut self, connected: &HashSet<i64>, view: GraphView) -> Vec<Node> {
        let tables = self.tables;
        let mut nodes = Vec::new();

        for node in tables.records(TAXI_NODES) {
            let id = node.i64("ID");
            let map = node.i64("ContinentID");
            if !connected.contains(&id) || !view.accepts(map) {
                continue;
            }

            let (x, y) = self
                .transformer
                .transform(node.f64("Pos[0]"), node.f64("Pos[1]"), map);
            let flags = node.i64("Flags");

            nodes.push(Node {
                id,
                label: node.text("Name_lang").replace('"', ""),
                position: Position {
                    x,
                    y,
                    z: node.f64("Pos[2]"),
                },
                map,
                flags,
                texture_kit: node.i64("UiTextureKitID"),
                atlas_member: node.i64("MinimapAtlasMemberID"),
                mounts: [
                    node.i64("MountCreatureID[0]"),
                    node.i64("MountCreatureID[1]"),
                ],
                color: node_color(flags),
            });
        }

        nodes
    }

    fn collect_waypoints(&mut self, edges: &[Edge], view: GraphView) -> Vec<WaypointRun> {
        let tables = self.tables;
        let mut by_path: HashMap<i64, Vec<Record<'_>>> = HashMap::new();
        for row in tables.records(TAXI_PATH_NODE) {
            by_path.entry(row.i64("PathID")).or_default().push(row);
        }
        for rows in by_path.values_mut() {
            rows.sort_by_key(|row| row.i64("NodeIndex"));
        }
        debug!("Grouped waypoints of {} paths", by_path.len());

        let mut runs = Vec::new();
        for edge in edges {
            let Some(rows) = by_path.get(&edge.id) else {
                continue;
            };

            let mut waypoints = Vec::new();
            for row in rows {
                let map = row.i64("ContinentID");
                if !view.accepts(map) {
                    continue;
                }
                let (x, y) = self
                    .transformer
                    .transform(row.f64("Loc[0]"), row.f64("Loc[1]"), map);
                waypoints.push(Waypoint {
                    id: row.i64("ID"),
                    path_id: edge.id,
                    index: row.i64("NodeIndex"),
                    position: Position {
                        x,
                        y,
                        z: row.f64("Loc[2]"),
                    },
                    map,
                    color: edge.color,
                });
            }

            if !waypoints.is_empty() {
                runs.push(WaypointRun {
                    path_id: edge.id,
                    from: edge.from,
                    to: edge.to,
                    waypoints,
                });
            }
        }

        runs
    }
}

fn collect_direct(edges: &[Edge], nodes: &[Node]) -> IndexMap<i64, IndexMap<i64, DirectEdge>> {
    let retained: HashSet<i64> = nodes.iter().map(|n| n.id).collect();
    let mut direct: IndexMap<i64, IndexMap<i64, DirectEdge>> = IndexMap::new();

    for node in nodes {
        for edge in edges.iter().filter(|e| e.from == node.id) {
            if !retained.contains(&edge.to) {
                continue;
            }
            direct
                .entry(node.id)
                .or_default()
                .entry(edge.to)
                .or_insert_with(|| DirectEdge {
                    from: node.id,
                    to: edge.to,
                    path_id: edge.id,
                    color: edge.color,
                });
        }
    }

    direct
}
