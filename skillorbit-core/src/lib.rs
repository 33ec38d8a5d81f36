//! Prerequisite-graph core for a browser learning-path visualizer.
//!
//! A topic is a DAG of concepts. `layout` pins every concept to an orbit by
//! level, `unlock` moves completion through the graph after each quiz, and
//! `app` wraps both in a single state value for the UI. The same code runs
//! natively (tests) and in the browser through the `wasm` bindings.

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod output;
pub mod quiz;
pub mod store;
pub mod unlock;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use app::{reduce, Action, AppState, AppView, View};
pub use config::Config;
pub use content::{ContentProvider, StaticCatalog, TopicBundle};
pub use error::{ConfigError, ContentError, Error, GraphError, StoreError, UnlockError};
pub use graph::{visual_distances, Edge, EdgeSpec, Graph, GraphSpec, Node, NodeId, NodeSpec};
pub use layout::{layout_graph, LayoutConfig, LayoutResult, Point};
pub use output::GraphOutput;
pub use quiz::{grade, NodeContent, Quiz, QuizResult};
pub use store::{GraphSnapshot, KeyValueStore, MemoryStore, SnapshotStore};
pub use unlock::{apply_attempt, AttemptChanges, AttemptOutcome};
