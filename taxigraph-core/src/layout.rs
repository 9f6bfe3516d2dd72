// Canvas placement of a node set

use crate::model::{Node, Position};
use serde::Serialize;

/// Offsets and extents that move a node set into non-negative space.
///
/// Extents are `max + abs(min)`, which is the span only when `min <= 0`.
/// Existing map images depend on this sizing, so it is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Layout {
    /// Returns `None` for an empty node set.
    pub fn compute(nodes: &[Node]) -> Option<Self> {
        let first = nodes.first()?.position;
        let (min, max) = nodes.iter().skip(1).fold((first, first), |(min, max), node| {
            let p = node.position;
            (
                Position {
                    x: min.x.min(p.x),
                    y: min.y.min(p.y),
                    z: min.z.min(p.z),
                },
                Position {
                    x: max.x.max(p.x),
                    y: max.y.max(p.y),
                    z: max.z.max(p.z),
                },
            )
        });

        let offset_x = min.x.abs();
        let offset_y = min.y.abs();
        let offset_z = min.z.abs();

        Some(Self {
            offset_x,
            offset_y,
            offset_z,
            width: max.x + offset_x,
            height: max.y + offset_y,
            depth: max.z + offset_z,
        })
    }

    pub fn shift(&self, position: Position) -> Position {
        Position {
            x: position.x + self.offset_x,
            y: position.y + self.offset_y,
            z: position.z + self.offset_z,
        }
    }
}
