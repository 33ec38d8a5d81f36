//! Hop distance from the unlocked frontier, for dimming far-away nodes.
//!
//! Edges are treated as undirected. Purely cosmetic: nothing here feeds back
//! into unlock state.

use super::Graph;

/// Minimum number of edge hops from any unlocked node, indexed by `NodeId`.
///
/// Unlocked nodes are at 0. `None` means no unlocked node reaches it (only
/// possible when the graph has no unlocked node in that component).
pub fn visual_distances(graph: &Graph) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = graph
        .nodes()
        .iter()
        .map(|n| if n.unlocked { Some(0) } else { None })
        .collect();

    // Relax until a full pass changes nothing.
    loop {
        let mut changed = false;
        for edge in graph.edges() {
            let (s, t) = (edge.source.0, edge.target.0);
            changed |= relax(&mut dist, s, t);
            changed |= relax(&mut dist, t, s);
        }
        if !changed {
            break;
        }
    }

    dist
}

fn relax(dist: &mut [Option<u32>], from: usize, to: usize) -> bool {
    let Some(d) = dist[from] else {
        return false;
    };
    let candidate = d + 1;
    match dist[to] {
        Some(current) if current <= candidate => false,
        _ => {
            dist[to] = Some(candidate);
            true
        }
    }
}
