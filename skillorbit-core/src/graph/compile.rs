//
// Build step: GraphSpec (surface form) -> Graph (indexed, validated value)
//
// What this does:
// - Enforces unique node identifiers and a level on every node
// - Resolves EdgeSpec endpoints from id -> NodeId, rejecting unknown ids
// - Rejects duplicate edges and prerequisite cycles
// - Seeds the initial unlock state (level 0 always unlocked)
// - Preserves input order for nodes and edges
//
// The resulting Graph is never mutated in place. Engines clone it and hand
// back a new value.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::adjacency::Adjacency;
use super::types::{EdgeSpec, GraphSpec, NodeSpec};
use crate::error::GraphError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub nid: NodeId,
    /// Unique identifier
    pub id: String,
    pub label: String,
    /// Depth in the prerequisite hierarchy (0 = root topic)
    pub level: u32,
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, NodeId>,
    adjacency: Adjacency,
}

impl Graph {
    pub fn build(spec: GraphSpec) -> Result<Graph, GraphError> {
        let mut ctx = BuildCtx::default();

        for node in spec.nodes {
            ctx.add_node(node)?;
        }
        for edge in spec.links {
            ctx.add_edge(edge)?;
        }

        ctx.finish()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_id(id).map(|nid| &self.nodes[nid.0])
    }

    /// Node by index. Indices come from this graph, so they are always in range.
    pub fn get(&self, nid: NodeId) -> &Node {
        &self.nodes[nid.0]
    }

    /// Prerequisite ids of a node, in edge order.
    pub fn parents_of(&self, nid: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.adjacency.parents(nid).iter().map(|&p| self.get(p))
    }

    /// Back to the surface form, carrying the current flags.
    pub fn to_spec(&self) -> GraphSpec {
        GraphSpec {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSpec {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    level: Some(n.level),
                    unlocked: Some(n.unlocked),
                    completed: Some(n.completed),
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|e| EdgeSpec::new(self.get(e.source).id.clone(), self.get(e.target).id.clone()))
                .collect(),
        }
    }
}

#[derive(Default)]
struct BuildCtx {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, NodeId>,
    seen_edges: HashSet<Edge>,
}

impl BuildCtx {
    fn add_node(&mut self, spec: NodeSpec) -> Result<(), GraphError> {
        if self.by_id.contains_key(&spec.id) {
            return Err(GraphError::DuplicateNode(spec.id));
        }
        let Some(level) = spec.level else {
            return Err(GraphError::MissingLevel(spec.id));
        };

        let completed = spec.completed.unwrap_or(false);
        let unlocked = match (level, spec.unlocked) {
            (0, _) => true,
            (_, Some(false)) if completed => {
                return Err(GraphError::CompletedButLocked(spec.id));
            }
            (_, Some(flag)) => flag,
            (_, None) => completed,
        };

        let nid = NodeId(self.nodes.len());
        self.by_id.insert(spec.id.clone(), nid);
        self.nodes.push(Node {
            nid,
            id: spec.id,
            label: spec.label,
            level,
            unlocked,
            completed,
        });
        Ok(())
    }

    fn resolve(&self, id: &str, edge: &EdgeSpec) -> Result<NodeId, GraphError> {
        self.by_id.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
            id: id.to_string(),
            from: edge.source.clone(),
            to: edge.target.clone(),
        })
    }

    fn add_edge(&mut self, spec: EdgeSpec) -> Result<(), GraphError> {
        let source = self.resolve(&spec.source, &spec)?;
        let target = self.resolve(&spec.target, &spec)?;
        let edge = Edge { source, target };

        if !self.seen_edges.insert(edge) {
            return Err(GraphError::DuplicateEdge {
                from: spec.source,
                to: spec.target,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    fn finish(self) -> Result<Graph, GraphError> {
        let adjacency = Adjacency::from_edges(self.nodes.len(), &self.edges);

        if let Some(nid) = adjacency.find_cycle() {
            return Err(GraphError::Cycle {
                id: self.nodes[nid.0].id.clone(),
            });
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "built prerequisite graph"
        );

        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
            by_id: self.by_id,
            adjacency,
        })
    }
}
