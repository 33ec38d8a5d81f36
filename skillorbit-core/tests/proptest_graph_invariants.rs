//! Property-based invariant tests for unlock propagation and orbit layout.
//!
//! Verifies, for random prerequisite DAGs and attempt sequences:
//! 1. Unlocked and completed sets never shrink
//! 2. A node only becomes unlocked once every prerequisite is completed
//! 3. Failed attempts change nothing
//! 4. Passing the same quiz twice equals passing it once
//! 5. Layout is deterministic and roots sit at the origin
//! 6. Every level lies on its orbit, evenly spaced in sorted order
//! 7. Lower in-degree never sits at a higher angular index than higher in-degree

use proptest::prelude::*;
use skillorbit_core::layout::orbit_angle;
use skillorbit_core::{
    apply_attempt, layout_graph, EdgeSpec, Graph, GraphSpec, LayoutConfig, NodeSpec, Point,
};

// ── Strategy helpers ──────────────────────────────────────────────────

/// A DAG on `n` nodes: edges only point from lower to higher index.
fn arb_graph() -> impl Strategy<Value = Graph> {
    (1usize..10)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(any::<bool>(), n * (n - 1) / 2),
                prop::collection::vec(1u32..5, n),
                prop::collection::vec(any::<bool>(), n),
            )
        })
        .prop_map(|(n, edge_bits, levels, seeded)| {
            let nodes = (0..n)
                .map(|i| {
                    let level = if i == 0 { 0 } else { levels[i] };
                    let spec = NodeSpec::new(format!("n{i}"), format!("Node {i}"), level);
                    // A few non-roots start unlocked, like a curated first step
                    if i > 0 && seeded[i] && i % 3 == 0 { spec.unlocked() } else { spec }
                })
                .collect();

            let mut links = Vec::new();
            let mut bit = 0;
            for s in 0..n {
                for t in (s + 1)..n {
                    if edge_bits[bit] {
                        links.push(EdgeSpec::new(format!("n{s}"), format!("n{t}")));
                    }
                    bit += 1;
                }
            }

            Graph::build(GraphSpec { nodes, links }).expect("generated graph is a valid DAG")
        })
}

fn arb_attempts() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..10, any::<bool>()), 0..30)
}

fn flags(graph: &Graph) -> Vec<(bool, bool)> {
    graph.nodes().iter().map(|n| (n.unlocked, n.completed)).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Monotonicity and AND-gating across attempt sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unlock_state_is_monotonic_and_gated(graph in arb_graph(), attempts in arb_attempts()) {
        let initial = flags(&graph);
        let mut current = graph;

        for (idx, passed) in attempts {
            let id = current.nodes()[idx % current.len()].id.clone();
            let Ok(outcome) = apply_attempt(&current, &id, passed) else {
                continue;
            };
            let before = flags(&current);
            let after = flags(&outcome.graph);

            for (b, a) in before.iter().zip(&after) {
                prop_assert!(!b.0 || a.0, "node re-locked");
                prop_assert!(!b.1 || a.1, "node un-completed");
                prop_assert!(!a.1 || a.0, "completed but locked");
            }

            for node in outcome.graph.nodes() {
                if node.unlocked && !initial[node.nid.0].0 {
                    prop_assert!(
                        outcome.graph.parents_of(node.nid).all(|p| p.completed),
                        "{} unlocked before all prerequisites were completed",
                        node.id
                    );
                }
            }
            current = outcome.graph;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Failure is a no-op, passing is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn failed_attempt_is_noop(graph in arb_graph(), idx in 0usize..10) {
        let id = graph.nodes()[idx % graph.len()].id.clone();
        if let Ok(outcome) = apply_attempt(&graph, &id, false) {
            prop_assert_eq!(&outcome.graph, &graph);
            prop_assert!(outcome.changes.is_empty());
        }
    }

    #[test]
    fn passing_twice_equals_once(graph in arb_graph(), idx in 0usize..10) {
        let id = graph.nodes()[idx % graph.len()].id.clone();
        if let Ok(once) = apply_attempt(&graph, &id, true) {
            let twice = apply_attempt(&once.graph, &id, true).expect("still unlocked");
            prop_assert_eq!(&once.graph, &twice.graph);
            prop_assert!(twice.changes.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5–7. Layout
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(graph in arb_graph(), step in 50.0f64..400.0) {
        let cfg = LayoutConfig { radius_step: step, ..LayoutConfig::default() };
        let a = layout_graph(&graph, &cfg);
        let b = layout_graph(&graph, &cfg);
        prop_assert_eq!(&a, &b);

        for node in graph.nodes().iter().filter(|n| n.level == 0) {
            prop_assert_eq!(a.get(node.nid), Point::ORIGIN);
        }
    }

    #[test]
    fn levels_lie_on_evenly_spaced_orbits(graph in arb_graph()) {
        let cfg = LayoutConfig::default();
        let result = layout_graph(&graph, &cfg);

        for orbit in result.orbits.iter().filter(|o| o.level > 0) {
            prop_assert_eq!(orbit.radius, cfg.radius(orbit.level));
            let count = orbit.members.len();
            for (i, &nid) in orbit.members.iter().enumerate() {
                let p = result.get(nid);
                let angle = orbit_angle(i, count);
                prop_assert!((p.distance_to(&Point::ORIGIN) - orbit.radius).abs() < 1e-6);
                prop_assert!((p.x - orbit.radius * angle.cos()).abs() < 1e-9);
                prop_assert!((p.y - orbit.radius * angle.sin()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn orbit_order_by_in_degree_then_id(graph in arb_graph()) {
        let result = layout_graph(&graph, &LayoutConfig::default());
        let adjacency = graph.adjacency();

        for orbit in &result.orbits {
            for pair in orbit.members.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let key_a = (adjacency.in_degree(a), &graph.get(a).id);
                let key_b = (adjacency.in_degree(b), &graph.get(b).id);
                prop_assert!(key_a < key_b);
            }
        }
    }
}
