// Orbit Layout Algorithm
//
// This module places every node on a circle around the origin:
// 1. Groups nodes by level (level 0 sits at the origin)
// 2. Orders each level by in-degree, then id
// 3. Spreads the level evenly around its orbit, index 0 at the top, clockwise
//
// Properties:
// - Deterministic (no randomness, no iteration)
// - Independent of node input order

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use super::{LayoutConfig, LayoutResult, Orbit, Point};
use crate::graph::{Graph, NodeId};

/// Angle for the node at `index` of `count` evenly spaced slots.
///
/// Index 0 points up (-π/2 in screen coordinates) and angles grow clockwise.
pub fn orbit_angle(index: usize, count: usize) -> f64 {
    (index as f64 / count.max(1) as f64) * TAU - FRAC_PI_2
}

/// Sort one level's members into angular order: fewer prerequisites first,
/// ties broken by ascending id.
pub fn level_order(graph: &Graph, members: &mut [NodeId]) {
    let adjacency = graph.adjacency();
    members.sort_by(|&a, &b| {
        adjacency
            .in_degree(a)
            .cmp(&adjacency.in_degree(b))
            .then_with(|| graph.get(a).id.cmp(&graph.get(b).id))
    });
}

pub(super) fn layout_orbits(graph: &Graph, cfg: &LayoutConfig) -> LayoutResult {
    let mut levels: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
    for node in graph.nodes() {
        levels.entry(node.level).or_default().push(node.nid);
    }

    let mut positions = vec![Point::ORIGIN; graph.len()];
    let mut orbits = Vec::with_capacity(levels.len());

    for (level, mut members) in levels {
        level_order(graph, &mut members);

        if level == 0 {
            // Roots are pinned to the center
            orbits.push(Orbit { level, radius: 0.0, members });
            continue;
        }

        let radius = cfg.radius(level);
        let count = members.len();
        for (i, &nid) in members.iter().enumerate() {
            let angle = orbit_angle(i, count);
            positions[nid.0] = Point {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            };
        }

        orbits.push(Orbit { level, radius, members });
    }

    LayoutResult { positions, orbits }
}
