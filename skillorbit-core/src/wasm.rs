//! WASM bindings for the skillorbit-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Values cross the boundary as JSON strings; failures come back as
//! `{"error": {...}}` objects instead of exceptions, except in the `Session`
//! constructor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::app::{reduce, Action, AppState, View};
use crate::config::Config;
use crate::content::{ContentProvider, StaticCatalog, TopicBundle};
use crate::error::{Error, StoreError};
use crate::graph::Graph;
use crate::layout::layout_graph;
use crate::logging::parse_level;
use crate::output::GraphOutput;
use crate::store::{GraphSnapshot, KeyValueStore, SnapshotStore};
use crate::unlock::{apply_attempt, AttemptChanges};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": { "kind": "encode", "message": e.to_string() } }).to_string()
    })
}

fn error_json(err: Error) -> String {
    console_error(&format!("skillorbit: {err}"));
    to_json(&GraphOutput::error(&err))
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) -> bool {
    crate::logging::init_logging(parse_level(level))
}

/// Topic bundle JSON for a built-in topic.
#[wasm_bindgen(js_name = builtinTopic)]
pub fn builtin_topic(topic: &str) -> String {
    match StaticCatalog::default().fetch_topic(topic) {
        Ok(bundle) => to_json(&bundle),
        Err(e) => error_json(e.into()),
    }
}

/// Validate a topic bundle and lay it out for the renderer.
#[wasm_bindgen(js_name = buildGraph)]
pub fn build_graph(bundle_json: &str, config_json: &str) -> String {
    let run = || -> Result<GraphOutput, Error> {
        let cfg = Config::from_json(config_json)?;
        let bundle = TopicBundle::from_json(bundle_json)?;
        let graph = Graph::build(bundle.graph)?;
        let layout = layout_graph(&graph, &cfg.layout);
        Ok(GraphOutput::render(&graph, &layout))
    };
    match run() {
        Ok(output) => to_json(&output),
        Err(e) => error_json(e),
    }
}

#[derive(Serialize)]
struct AttemptOutput {
    snapshot: GraphSnapshot,
    changes: AttemptChanges,
}

/// Apply one quiz attempt to a snapshot and return the next snapshot.
#[wasm_bindgen(js_name = submitAttempt)]
pub fn submit_attempt(snapshot_json: &str, node_id: &str, passed: bool) -> String {
    let run = || -> Result<AttemptOutput, Error> {
        let snapshot: GraphSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|source| StoreError::Corrupt { key: "snapshot".to_string(), source })?;
        let graph = snapshot.restore()?;
        let outcome = apply_attempt(&graph, node_id, passed)?;
        let mut next = GraphSnapshot::capture(&outcome.graph, &snapshot.topic);
        next.node_content = snapshot.node_content;
        Ok(AttemptOutput {
            snapshot: next,
            changes: outcome.changes,
        })
    };
    match run() {
        Ok(output) => to_json(&output),
        Err(e) => error_json(e),
    }
}

// ============================================================================
// localStorage backend
// ============================================================================

pub struct LocalStorage {
    storage: web_sys::Storage,
}

fn js_err(value: JsValue) -> StoreError {
    StoreError::Backend(format!("{value:?}"))
}

impl LocalStorage {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let len = self.storage.length().map_err(js_err)?;
        let mut keys = Vec::new();
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(js_err)? {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(js_err)
    }
}

// ============================================================================
// Session: app state + snapshot persistence for one page
// ============================================================================

#[wasm_bindgen]
pub struct Session {
    state: AppState,
    config: Config,
    store: SnapshotStore<LocalStorage>,
    catalog: StaticCatalog,
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Session, JsValue> {
        let config = Config::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let storage = match LocalStorage::open() {
            Ok(storage) => Some(storage),
            Err(e) => {
                console_error(&format!("skillorbit: {e}"));
                None
            }
        };
        let store = SnapshotStore::open(storage, config.storage_prefix.clone());
        Ok(Session {
            state: AppState::default(),
            config,
            store,
            catalog: StaticCatalog::default(),
        })
    }

    /// Whether snapshots survive a reload.
    #[wasm_bindgen(getter)]
    pub fn persistent(&self) -> bool {
        self.store.is_persistent()
    }

    /// Current view model as JSON.
    pub fn view(&self) -> String {
        to_json(&self.state.view_model())
    }

    /// Apply an action (JSON, `{"type": "...", ...}`) and return the view.
    /// Passed quizzes are saved right away.
    pub fn dispatch(&mut self, action_json: &str) -> String {
        let action: Action = match serde_json::from_str(action_json) {
            Ok(action) => action,
            Err(e) => return error_json(Error::Action(e)),
        };
        let autosave = matches!(action, Action::SubmitAnswer { .. });
        self.apply(action);
        if autosave && self.state.last_result.is_some_and(|r| r.passed) {
            self.persist();
        }
        self.view()
    }

    /// Load a built-in topic through the same actions a remote fetch uses.
    #[wasm_bindgen(js_name = loadBuiltin)]
    pub fn load_builtin(&mut self, topic: &str) -> String {
        self.apply(Action::SubmitTopic { topic: topic.to_string() });
        if self.state.view != View::Loading {
            return self.view();
        }
        let next = match self.catalog.fetch_topic(topic) {
            Ok(bundle) => Action::TopicLoaded { topic: topic.to_string(), bundle },
            Err(e) => Action::TopicFailed { message: e.to_string() },
        };
        self.apply(next);
        self.view()
    }

    /// Save the current graph. Returns the view (with a notice on failure).
    pub fn save(&mut self) -> String {
        self.persist();
        self.view()
    }

    /// Restore a saved snapshot for `topic`.
    pub fn restore(&mut self, topic: &str) -> String {
        match self.store.load(topic) {
            Ok(Some(mut snapshot)) => {
                // Older snapshots carry no content; built-in topics can fill it in
                if snapshot.node_content.is_none() {
                    if let Ok(bundle) = self.catalog.fetch_topic(&snapshot.topic) {
                        snapshot.node_content = Some(bundle.node_content);
                    }
                }
                self.apply(Action::SnapshotRestored { snapshot })
            }
            Ok(None) => self.apply(Action::TopicFailed { message: format!("No saved progress for {topic}") }),
            Err(e) => self.apply(Action::TopicFailed { message: e.to_string() }),
        }
        self.view()
    }

    /// Saved topics as a JSON array.
    #[wasm_bindgen(js_name = savedTopics)]
    pub fn saved_topics(&self) -> String {
        match self.store.topics() {
            Ok(topics) => to_json(&topics),
            Err(e) => error_json(e.into()),
        }
    }

    pub fn forget(&mut self, topic: &str) -> Result<(), JsValue> {
        self.store.remove(topic).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Session {
    fn apply(&mut self, action: Action) {
        self.state = reduce(&self.state, action, &self.config.layout);
    }

    fn persist(&mut self) {
        let Some(snapshot) = self.state.snapshot() else {
            return;
        };
        if let Err(e) = self.store.save(&snapshot) {
            console_error(&format!("skillorbit: {e}"));
            self.state.notice = Some(crate::app::Notice::error(format!("Couldn't save progress: {e}")));
        }
    }
}
