//! Output types for renderer consumption.
//!
//! These structs are serialized to JSON and handed to the front end, which
//! draws nodes at the given coordinates and reports clicks by node id.

use serde::Serialize;

use crate::error::Error;
use crate::graph::{visual_distances, Graph};
use crate::layout::LayoutResult;

/// A node ready for the renderer to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub label: String,
    pub level: u32,
    pub x: f64,
    pub y: f64,
    pub unlocked: bool,
    pub completed: bool,
    /// Hops from the nearest unlocked node (for dimming). None = unreachable.
    pub distance: Option<u32>,
}

/// A prerequisite link, by node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeOutput {
    pub source: String,
    pub target: String,
}

/// An orbit ring, for drawing guide circles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitOutput {
    pub level: u32,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    /// One of `Error::kind`: "graph", "unlock", "content", "store", "config", "action"
    pub kind: String,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// The combined output sent to the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orbits: Vec<OrbitOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl GraphOutput {
    pub fn render(graph: &Graph, layout: &LayoutResult) -> Self {
        let distances = visual_distances(graph);

        let nodes = graph
            .nodes()
            .iter()
            .map(|n| {
                let p = layout.get(n.nid);
                NodeOutput {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    level: n.level,
                    x: p.x,
                    y: p.y,
                    unlocked: n.unlocked,
                    completed: n.completed,
                    distance: distances[n.nid.0],
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeOutput {
                source: graph.get(e.source).id.clone(),
                target: graph.get(e.target).id.clone(),
            })
            .collect();

        let orbits = layout
            .orbits
            .iter()
            .filter(|o| o.level > 0)
            .map(|o| OrbitOutput { level: o.level, radius: o.radius })
            .collect();

        Self { nodes, edges, orbits, error: None }
    }

    pub fn error(err: &Error) -> Self {
        Self {
            error: Some(ErrorInfo::from(err)),
            ..Self::default()
        }
    }
}
