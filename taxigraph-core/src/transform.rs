// Map coordinate conventions

use std::collections::HashSet;
use tracing::warn;

/// Maps whose orientation has been checked against the rendered output.
pub const KNOWN_MAPS: &[i64] = &[
    0,    // Eastern Kingdoms
    1,    // Kalimdor
    530,  // Outland
    571,  // Northrend
    870,  // Pandaria
    1116, // Draenor
    1220, // Broken Isles
    1642, // Zandalar
    1643, // Kul Tiras
    1718, // Nazjatar
    2222, // Shadowlands
    2444, // Dragon Isles
];

/// Moves world coordinates into the rendering plane.
///
/// World X points north and world Y points west. Rotating by -90 degrees and
/// negating the new x gives screen x growing east and screen y growing south.
#[derive(Debug, Default)]
pub struct CoordinateTransformer {
    reported: HashSet<i64>,
}

impl CoordinateTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&mut self, x: f64, y: f64, map: i64) -> (f64, f64) {
        if !KNOWN_MAPS.contains(&map) && self.reported.insert(map) {
            warn!(
                "Map {} has no verified orientation, applying the default transform",
                map
            );
        }
        rotate_and_flip(x, y)
    }

    /// Unknown map ids seen so far, in ascending order.
    pub fn unknown_maps(&self) -> Vec<i64> {
        let mut maps: Vec<i64> = self.reported.iter().copied().collect();
        maps.sort_unstable();
        maps
    }
}

fn rotate_and_flip(x: f64, y: f64) -> (f64, f64) {
    // rotate -90: (x, y) -> (y, -x)
    let (rx, ry) = (y, -x);
    (-rx, ry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_and_flip() {
        assert_eq!(rotate_and_flip(100.0, 20.0), (-20.0, -100.0));
        assert_eq!(rotate_and_flip(-5.0, -3.0), (3.0, 5.0));
    }

    #[test]
    fn test_unknown_map_reported_once() {
        let mut transformer = CoordinateTransformer::new();
        transformer.transform(1.0, 2.0, 9999);
        transformer.transform(3.0, 4.0, 9999);
        transformer.transform(3.0, 4.0, 1);
        assert_eq!(transformer.unknown_maps(), vec![9999]);
    }

    #[test]
    fn test_unknown_map_uses_default_transform() {
        let mut transformer = CoordinateTransformer::new();
        assert_eq!(
            transformer.transform(100.0, 20.0, 9999),
            transformer.transform(100.0, 20.0, 0)
        );
    }
}
