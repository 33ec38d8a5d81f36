//! Error types for skillorbit-core.
//!
//! Each concern has its own error enum; `Error` collects them for callers
//! that cross several (the app reducer, the wasm bindings).

use thiserror::Error;

/// Rejected graph construction. The graph data from the content provider is
/// broken and nothing is dropped or invented to paper over it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate node identifier: {0}")]
    DuplicateNode(String),

    #[error("node '{0}' has no level")]
    MissingLevel(String),

    #[error("edge {from} -> {to} references unknown node '{id}'")]
    UnknownNode { id: String, from: String, to: String },

    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("prerequisite cycle through node '{id}'")]
    Cycle { id: String },

    #[error("node '{0}' is completed but locked")]
    CompletedButLocked(String),
}

/// Rejected quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("node '{0}' is locked")]
    Locked(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("couldn't parse topic data.\n{0}")]
    Parse(#[from] serde_json::Error),

    #[error("quiz for '{node}': {reason}")]
    InvalidQuiz { node: String, reason: String },

    #[error("content for unknown node '{0}'")]
    OrphanContent(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend: {0}")]
    Backend(String),

    #[error("snapshot '{key}' is corrupt.\n{source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("couldn't encode snapshot.\n{0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't parse config.\n{0}")]
    Parse(#[from] serde_json::Error),

    #[error("orbit radius for level {level} is invalid: {radius}")]
    InvalidRadius { level: u32, radius: f64 },

    #[error("orbit radius for level {level} ({radius}) must exceed level {prev_level} ({prev_radius})")]
    NotIncreasing {
        level: u32,
        radius: f64,
        prev_level: u32,
        prev_radius: f64,
    },

    #[error("radius step must be finite and positive, got {0}")]
    InvalidStep(f64),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Unlock(#[from] UnlockError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A host sent an action the reducer can't decode.
    #[error("invalid action.\n{0}")]
    Action(#[source] serde_json::Error),
}

impl Error {
    /// Short machine-readable kind, used in renderer error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Graph(_) => "graph",
            Error::Unlock(_) => "unlock",
            Error::Content(_) => "content",
            Error::Store(_) => "store",
            Error::Config(_) => "config",
            Error::Action(_) => "action",
        }
    }
}
