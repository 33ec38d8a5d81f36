// Parent/child indexing over the prerequisite edges.
//
// Built once per graph and shared by:
// 1. Unlock propagation (all parents completed => unlock)
// 2. Layout ordering (in-degree is the primary sort key within a level)
// 3. Cycle detection during construction
//
// Lists keep edge input order so everything downstream stays deterministic.

use super::{Edge, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    /// For each node, the sources of its incoming edges.
    parents: Vec<Vec<NodeId>>,
    /// For each node, the targets of its outgoing edges.
    children: Vec<Vec<NodeId>>,
}

impl Adjacency {
    /// Build adjacency for `node_count` nodes from resolved edges.
    pub fn from_edges(node_count: usize, edges: &[Edge]) -> Self {
        let mut parents = vec![Vec::new(); node_count];
        let mut children = vec![Vec::new(); node_count];

        for edge in edges {
            parents[edge.target.0].push(edge.source);
            children[edge.source.0].push(edge.target);
        }

        Self { parents, children }
    }

    /// Prerequisites of a node, or empty slice if none.
    pub fn parents(&self, nid: NodeId) -> &[NodeId] {
        self.parents.get(nid.0).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Nodes that list this one as a prerequisite.
    pub fn children(&self, nid: NodeId) -> &[NodeId] {
        self.children.get(nid.0).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of incoming prerequisite edges.
    pub fn in_degree(&self, nid: NodeId) -> usize {
        self.parents(nid).len()
    }

    /// Find a node that lies on a directed cycle, if any.
    ///
    /// Depth-first in node order; the first back edge found names a node on
    /// the cycle. Self-loops count.
    pub fn find_cycle(&self) -> Option<NodeId> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        fn visit(adj: &Adjacency, nid: NodeId, marks: &mut [Mark]) -> Option<NodeId> {
            marks[nid.0] = Mark::Active;
            for &child in adj.children(nid) {
                match marks[child.0] {
                    Mark::Active => return Some(child),
                    Mark::New => {
                        if let Some(hit) = visit(adj, child, marks) {
                            return Some(hit);
                        }
                    }
                    Mark::Done => {}
                }
            }
            marks[nid.0] = Mark::Done;
            None
        }

        let mut marks = vec![Mark::New; self.children.len()];
        for start in 0..self.children.len() {
            if marks[start] == Mark::New {
                if let Some(hit) = visit(self, NodeId(start), &mut marks) {
                    return Some(hit);
                }
            }
        }
        None
    }
}
