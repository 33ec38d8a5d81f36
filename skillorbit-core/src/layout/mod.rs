// Orbit layouter for prerequisite graphs.
//
// Goals:
// - Deterministic: no randomness, no physics needed for placement
// - Hierarchy is visible: every level sits on its own orbit around the root
// - Stable ordering within a level (in-degree, then id)
//
// Submodules:
// - orbit: per-level ordering and angular placement
//
// Output:
// - LayoutResult with a position for every node and the orbit rings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::{Graph, NodeId};

mod orbit;

pub use orbit::{level_order, orbit_angle};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Radius at level 0 for the extrapolated formula.
    pub base_radius: f64,
    /// Added per level for levels without a configured radius.
    pub radius_step: f64,
    /// Explicit orbit radius per level. Must increase with level.
    pub orbit_radii: BTreeMap<u32, f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 0.0,
            radius_step: 250.0,
            orbit_radii: BTreeMap::new(),
        }
    }
}

impl LayoutConfig {
    /// Orbit radius for a level: the configured one, else `base + level * step`.
    pub fn radius(&self, level: u32) -> f64 {
        self.orbit_radii
            .get(&level)
            .copied()
            .unwrap_or_else(|| self.base_radius + level as f64 * self.radius_step)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius_step.is_finite() || self.radius_step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.radius_step));
        }
        if !self.base_radius.is_finite() || self.base_radius < 0.0 {
            return Err(ConfigError::InvalidRadius { level: 0, radius: self.base_radius });
        }

        for (&level, &radius) in &self.orbit_radii {
            if !radius.is_finite() || radius < 0.0 || (level > 0 && radius == 0.0) {
                return Err(ConfigError::InvalidRadius { level, radius });
            }
        }

        // Unconfigured stretches grow by `radius_step`, so only the rings
        // next to a configured level can break the ordering.
        for &level in self.orbit_radii.keys() {
            if level > 1 {
                self.check_increasing(level)?;
            }
            if level > 0 && level < u32::MAX {
                self.check_increasing(level + 1)?;
            }
        }
        Ok(())
    }

    /// `radius(level)` must exceed `radius(level - 1)`.
    fn check_increasing(&self, level: u32) -> Result<(), ConfigError> {
        let (radius, prev_level) = (self.radius(level), level - 1);
        let prev_radius = self.radius(prev_level);
        if radius <= prev_radius {
            return Err(ConfigError::NotIncreasing { level, radius, prev_level, prev_radius });
        }
        Ok(())
    }
}

/// One ring of the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orbit {
    pub level: u32,
    pub radius: f64,
    /// Nodes in angular order, index 0 at the top.
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Position per node, indexed by `NodeId`.
    pub positions: Vec<Point>,
    /// Rings in ascending level order. Level 0 is included with radius 0.
    pub orbits: Vec<Orbit>,
}

impl LayoutResult {
    pub fn get(&self, nid: NodeId) -> Point {
        self.positions.get(nid.0).copied().unwrap_or(Point::ORIGIN)
    }

    /// Position by string id.
    pub fn position(&self, graph: &Graph, id: &str) -> Option<Point> {
        graph.node_id(id).map(|nid| self.get(nid))
    }
}

pub fn layout_graph(graph: &Graph, cfg: &LayoutConfig) -> LayoutResult {
    orbit::layout_orbits(graph, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_configured_and_extrapolated() {
        let mut cfg = LayoutConfig::default();
        assert_eq!(cfg.radius(0), 0.0);
        assert_eq!(cfg.radius(3), 750.0);

        cfg.orbit_radii.insert(1, 180.0);
        cfg.orbit_radii.insert(2, 320.0);
        assert_eq!(cfg.radius(1), 180.0);
        assert_eq!(cfg.radius(2), 320.0);
        // Level 3 has no entry, falls back to base + level * step
        assert_eq!(cfg.radius(3), 750.0);
    }

    #[test]
    fn test_validate_rejects_decreasing_radii() {
        let mut cfg = LayoutConfig::default();
        cfg.orbit_radii.insert(1, 300.0);
        cfg.orbit_radii.insert(2, 200.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::NotIncreasing { level: 2, .. })));
    }

    #[test]
    fn test_validate_checks_against_extrapolated_neighbours() {
        // Level 1 pushed past where level 2 would be drawn (500)
        let mut cfg = LayoutConfig::default();
        cfg.orbit_radii.insert(1, 1000.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotIncreasing { level: 2, prev_level: 1, .. })
        ));

        // Level 3 pulled inside level 2 (500)
        let mut cfg = LayoutConfig::default();
        cfg.orbit_radii.insert(3, 400.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotIncreasing { level: 3, prev_level: 2, .. })
        ));

        // Gaps between configured levels are filled in by the formula
        let mut cfg = LayoutConfig::default();
        cfg.orbit_radii.insert(1, 100.0);
        cfg.orbit_radii.insert(3, 600.0);
        assert!(cfg.validate().is_ok());
        let radii: Vec<f64> = (1..=5).map(|l| cfg.radius(l)).collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_validate_rejects_zero_orbit() {
        let mut cfg = LayoutConfig::default();
        cfg.orbit_radii.insert(1, 0.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRadius { level: 1, .. })));
    }

    #[test]
    fn test_validate_rejects_bad_step() {
        let cfg = LayoutConfig { radius_step: 0.0, ..LayoutConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStep(_))));
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg: LayoutConfig = serde_json::from_str(r#"{ "orbit_radii": { "1": 150.0 } }"#).unwrap();
        assert_eq!(cfg.radius_step, 250.0);
        assert_eq!(cfg.radius(1), 150.0);
    }
}
