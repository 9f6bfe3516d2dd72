// Graph data model

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A taxi node, already moved into the rendering plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: i64,
    pub label: String,
    pub position: Position,
    pub map: i64,
    pub flags: i64,
    pub texture_kit: i64,
    pub atlas_member: i64,
    pub mounts: [i64; 2],
    /// Fill color picked by flag priority
    pub color: &'static str,
}

/// A taxi path between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    pub cost: i64,
    pub color: &'static str,
}

/// An intermediate point of a taxi path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub id: i64,
    pub path_id: i64,
    pub index: i64,
    pub position: Position,
    pub map: i64,
    pub color: &'static str,
}

/// The waypoints of one edge, in route order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointRun {
    pub path_id: i64,
    pub from: i64,
    pub to: i64,
    pub waypoints: Vec<Waypoint>,
}

/// A straight connector from a node to a directly reachable node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectEdge {
    pub from: i64,
    pub to: i64,
    pub path_id: i64,
    pub color: &'static str,
}

/// The graph for one view of the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub edges: Vec<Edge>,
    pub nodes: Vec<Node>,
    pub waypoints: Vec<WaypointRun>,
    /// Direct destinations per source node id, keyed by destination id
    pub direct: IndexMap<i64, IndexMap<i64, DirectEdge>>,
}

impl Graph {
    pub fn node(&self, id: i64) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_node(&self, id: i64) -> bool {
        self.node(id).is_some()
    }

    pub fn direct_edges(&self) -> impl Iterator<Item = &DirectEdge> {
        self.direct.values().flat_map(|dests| dests.values())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
