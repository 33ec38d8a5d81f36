mod adjacency;
mod compile;
mod distance;
mod types;

pub use adjacency::Adjacency;
pub use compile::{Edge, Graph, Node, NodeId};
pub use distance::visual_distances;
pub use types::{EdgeSpec, GraphSpec, NodeSpec};
