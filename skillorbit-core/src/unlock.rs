//! Unlock propagation over the prerequisite graph.
//!
//! A node unlocks once **every** prerequisite is completed. `unlocked` and
//! `completed` are one-way flags: nothing here ever clears them.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::UnlockError;
use crate::graph::Graph;

/// Result of a quiz attempt: the next graph value and what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub graph: Graph,
    pub changes: AttemptChanges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttemptChanges {
    /// The attempted node went from not completed to completed.
    pub newly_completed: bool,
    /// Ids that became unlocked, in graph order.
    pub newly_unlocked: Vec<String>,
}

impl AttemptChanges {
    pub fn is_empty(&self) -> bool {
        !self.newly_completed && self.newly_unlocked.is_empty()
    }
}

/// Apply a quiz attempt on `node_id` and compute the next graph state.
///
/// Attempts on unknown or locked nodes are rejected. A failed attempt
/// returns an unchanged graph.
pub fn apply_attempt(graph: &Graph, node_id: &str, passed: bool) -> Result<AttemptOutcome, UnlockError> {
    let nid = graph
        .node_id(node_id)
        .ok_or_else(|| UnlockError::UnknownNode(node_id.to_string()))?;

    if !graph.get(nid).unlocked {
        return Err(UnlockError::Locked(node_id.to_string()));
    }

    debug!(node = node_id, passed, "quiz attempt");

    let mut next = graph.clone();
    let mut changes = AttemptChanges::default();

    if !passed {
        return Ok(AttemptOutcome { graph: next, changes });
    }

    if !next.nodes[nid.0].completed {
        next.nodes[nid.0].completed = true;
        changes.newly_completed = true;
    }

    // Only `completed` feeds the predicate and the attempt changed at most one
    // node, so a single pass over the still-locked nodes reaches the fixpoint.
    for i in 0..next.nodes.len() {
        if next.nodes[i].unlocked {
            continue;
        }
        let cand = next.nodes[i].nid;
        let parents = next.adjacency().parents(cand);
        // Parentless nodes only unlock through their initial state.
        if parents.is_empty() {
            continue;
        }
        if parents.iter().all(|&p| next.get(p).completed) {
            info!(node = %next.nodes[i].id, "unlocked");
            changes.newly_unlocked.push(next.nodes[i].id.clone());
            next.nodes[i].unlocked = true;
        }
    }

    Ok(AttemptOutcome { graph: next, changes })
}
