use serde::{Deserialize, Deserializer, Serialize};

/// Surface form of a graph as delivered by a content provider or restored
/// from a snapshot. Nothing here is validated yet; see `Graph::build`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    #[serde(alias = "edges")]
    pub links: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub label: String,
    /// Required for a valid graph; optional here so a missing level is
    /// reported as a graph error instead of a parse error.
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            level: Some(level),
            unlocked: None,
            completed: None,
        }
    }

    pub fn unlocked(mut self) -> Self {
        self.unlocked = Some(true);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = Some(true);
        self
    }
}

/// A prerequisite link: `source` must be completed before `target` unlocks.
///
/// Endpoints are plain ids. Renderers annotate links in place with the node
/// objects they resolved, so both `"ML"` and `{"id": "ML", ...}` are accepted
/// on input and collapsed to the id here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(deserialize_with = "endpoint")]
    pub source: String,
    #[serde(deserialize_with = "endpoint")]
    pub target: String,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Id(String),
    Node { id: String },
}

fn endpoint<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match EndpointRepr::deserialize(deserializer)? {
        EndpointRepr::Id(id) => id,
        EndpointRepr::Node { id } => id,
    })
}
