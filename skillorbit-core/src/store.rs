//! Snapshot persistence.
//!
//! Graph snapshots are stored as JSON under `prefix + topic` in any
//! `KeyValueStore`. When the backend is missing or broken, `SnapshotStore`
//! keeps working against an in-memory map for the rest of the session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GraphError, StoreError};
use crate::graph::{Graph, GraphSpec};
use crate::quiz::NodeContent;

pub trait KeyValueStore {
    /// Keys starting with `prefix`, in lexicographic order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Serialized graph state for one topic.
///
/// `node_content` travels with the flags so a restored session grades
/// answers the same way. `None` means the snapshot was taken without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub topic: String,
    #[serde(flatten)]
    pub graph: GraphSpec,
    #[serde(default, rename = "nodeContent", skip_serializing_if = "Option::is_none")]
    pub node_content: Option<BTreeMap<String, NodeContent>>,
}

impl GraphSnapshot {
    pub fn capture(graph: &Graph, topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            graph: graph.to_spec(),
            node_content: None,
        }
    }

    pub fn with_content(mut self, content: BTreeMap<String, NodeContent>) -> Self {
        self.node_content = Some(content);
        self
    }

    /// Rebuild the graph. Snapshots get the same validation as fresh topics.
    pub fn restore(&self) -> Result<Graph, GraphError> {
        Graph::build(self.graph.clone())
    }
}

enum Backend<S> {
    Persistent(S),
    Memory(MemoryStore),
}

pub struct SnapshotStore<S> {
    backend: Backend<S>,
    prefix: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    /// Use `store` if it answers a probe, otherwise fall back to memory.
    pub fn open(store: Option<S>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let backend = match store {
            Some(store) => match store.list(&prefix) {
                Ok(_) => Backend::Persistent(store),
                Err(e) => {
                    warn!(error = %e, "snapshot storage unavailable, keeping snapshots in memory");
                    Backend::Memory(MemoryStore::new())
                }
            },
            None => {
                warn!("no snapshot storage, keeping snapshots in memory");
                Backend::Memory(MemoryStore::new())
            }
        };
        Self { backend, prefix }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, Backend::Persistent(_))
    }

    fn kv(&self) -> &dyn KeyValueStore {
        match &self.backend {
            Backend::Persistent(s) => s,
            Backend::Memory(m) => m,
        }
    }

    fn kv_mut(&mut self) -> &mut dyn KeyValueStore {
        match &mut self.backend {
            Backend::Persistent(s) => s,
            Backend::Memory(m) => m,
        }
    }

    fn key(&self, topic: &str) -> String {
        format!("{}{}", self.prefix, topic)
    }

    pub fn save(&mut self, snapshot: &GraphSnapshot) -> Result<(), StoreError> {
        let key = self.key(&snapshot.topic);
        let value = serde_json::to_string(snapshot).map_err(StoreError::Encode)?;
        debug!(%key, bytes = value.len(), "saving snapshot");
        self.kv_mut().set(&key, &value)
    }

    pub fn load(&self, topic: &str) -> Result<Option<GraphSnapshot>, StoreError> {
        let key = self.key(topic);
        let Some(value) = self.kv().get(&key)? else {
            return Ok(None);
        };
        serde_json::from_str(&value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Topics with a saved snapshot.
    pub fn topics(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .kv()
            .list(&self.prefix)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }

    pub fn remove(&mut self, topic: &str) -> Result<(), StoreError> {
        let key = self.key(topic);
        self.kv_mut().delete(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeSpec, NodeSpec};
    use crate::unlock::apply_attempt;

    const PREFIX: &str = "skillorbit:graph:";

    /// A backend that refuses everything, like storage disabled in a browser.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn list(&self, _prefix: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn delete(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    fn graph() -> Graph {
        Graph::build(GraphSpec {
            nodes: vec![NodeSpec::new("A", "Root", 0), NodeSpec::new("B", "Next", 1)],
            links: vec![EdgeSpec::new("A", "B")],
        })
        .unwrap()
    }

    #[test]
    fn test_memory_store_list_by_prefix() {
        let mut store = MemoryStore::new();
        store.set("a:1", "x").unwrap();
        store.set("b:1", "y").unwrap();
        store.set("a:2", "z").unwrap();

        assert_eq!(store.list("a:").unwrap(), vec!["a:1", "a:2"]);
        store.delete("a:1").unwrap();
        assert_eq!(store.list("a:").unwrap(), vec!["a:2"]);
        assert_eq!(store.get("b:1").unwrap().as_deref(), Some("y"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_save_and_restore_progress() {
        let mut store = SnapshotStore::open(Some(MemoryStore::new()), PREFIX);
        assert!(store.is_persistent());

        let progressed = apply_attempt(&graph(), "A", true).unwrap().graph;
        store.save(&GraphSnapshot::capture(&progressed, "Basics")).unwrap();

        assert_eq!(store.topics().unwrap(), vec!["Basics"]);
        let restored = store.load("Basics").unwrap().unwrap().restore().unwrap();
        assert_eq!(restored, progressed);

        store.remove("Basics").unwrap();
        assert_eq!(store.load("Basics").unwrap(), None);
        assert!(store.topics().unwrap().is_empty());
    }

    #[test]
    fn test_content_survives_save_and_load() {
        let mut store = SnapshotStore::open(Some(MemoryStore::new()), PREFIX);
        let content = BTreeMap::from([(
            "B".to_string(),
            NodeContent { content: "Second step".into(), quiz: None },
        )]);
        let snapshot = GraphSnapshot::capture(&graph(), "Basics").with_content(content.clone());
        store.save(&snapshot).unwrap();

        let loaded = store.load("Basics").unwrap().unwrap();
        assert_eq!(loaded.node_content, Some(content));
        assert_eq!(loaded, snapshot);

        // Snapshots saved without content still load
        let mut kv = MemoryStore::new();
        kv.set(
            &format!("{PREFIX}Old"),
            r#"{"topic":"Old","nodes":[{"id":"A","label":"Root","level":0}],"links":[]}"#,
        )
        .unwrap();
        let old = SnapshotStore::open(Some(kv), PREFIX).load("Old").unwrap().unwrap();
        assert_eq!(old.node_content, None);
        assert!(old.restore().is_ok());
    }

    #[test]
    fn test_falls_back_to_memory() {
        for mut store in [
            SnapshotStore::open(Some(BrokenStore), PREFIX),
            SnapshotStore::open(None::<BrokenStore>, PREFIX),
        ] {
            assert!(!store.is_persistent());
            store.save(&GraphSnapshot::capture(&graph(), "Basics")).unwrap();
            assert_eq!(store.topics().unwrap(), vec!["Basics"]);
            assert!(store.load("Basics").unwrap().is_some());
        }
    }

    #[test]
    fn test_corrupt_snapshot_reported() {
        let mut kv = MemoryStore::new();
        kv.set(&format!("{PREFIX}Broken"), "{not json").unwrap();
        let store = SnapshotStore::open(Some(kv), PREFIX);

        assert!(matches!(store.load("Broken"), Err(StoreError::Corrupt { .. })));
    }
}
