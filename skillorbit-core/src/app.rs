//! Application state as one value, moved forward by discrete actions.
//!
//! The host UI owns an `AppState`, feeds it `Action`s and renders
//! `AppState::view_model`. Failed actions leave the graph untouched and set a
//! notice instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::TopicBundle;
use crate::error::Error;
use crate::graph::Graph;
use crate::layout::{layout_graph, LayoutConfig, LayoutResult};
use crate::output::GraphOutput;
use crate::quiz::{grade, NodeContent, QuizResult};
use crate::store::GraphSnapshot;
use crate::unlock::apply_attempt;

pub const LOCKED_MESSAGE: &str = "Locked. Finish previous quizzes.";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Loading,
    Graph,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// A loaded topic: graph, its fixed layout and node content.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSession {
    pub topic: String,
    pub graph: Graph,
    pub layout: LayoutResult,
    pub content: BTreeMap<String, NodeContent>,
}

impl TopicSession {
    fn open(bundle: TopicBundle, cfg: &LayoutConfig) -> Result<Self, Error> {
        bundle.validate()?;
        let graph = Graph::build(bundle.graph)?;
        let layout = layout_graph(&graph, cfg);
        Ok(Self {
            topic: bundle.topic,
            graph,
            layout,
            content: bundle.node_content,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub view: View,
    pub topic: Option<String>,
    pub session: Option<TopicSession>,
    pub selected: Option<String>,
    pub last_result: Option<QuizResult>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SubmitTopic { topic: String },
    /// Answer to the `SubmitTopic` for `topic`. Ignored unless that request
    /// is still pending.
    TopicLoaded { topic: String, bundle: TopicBundle },
    TopicFailed { message: String },
    SnapshotRestored { snapshot: GraphSnapshot },
    SelectNode { id: String },
    CloseNode,
    SubmitAnswer { answer: Option<usize> },
    DismissNotice,
    Reset,
}

impl AppState {
    /// Where to go back to when loading fails.
    fn settled_view(&self) -> View {
        if self.session.is_some() { View::Graph } else { View::Home }
    }

    fn with_notice(&self, notice: Notice) -> AppState {
        AppState {
            notice: Some(notice),
            ..self.clone()
        }
    }

    /// Snapshot of the current graph and its content, for persistence.
    pub fn snapshot(&self) -> Option<GraphSnapshot> {
        self.session
            .as_ref()
            .map(|s| GraphSnapshot::capture(&s.graph, &s.topic).with_content(s.content.clone()))
    }

    pub fn view_model(&self) -> AppView {
        let selected = self.session.as_ref().and_then(|s| {
            let id = self.selected.as_deref()?;
            let node = s.graph.node(id)?;
            let content = s.content.get(id);
            Some(SelectedView {
                id: node.id.clone(),
                label: node.label.clone(),
                completed: node.completed,
                content: content.map(|c| c.content.clone()).unwrap_or_default(),
                quiz: content.and_then(|c| c.quiz.as_ref()).map(|q| QuizView {
                    question: q.question.clone(),
                    options: q.options.clone(),
                }),
            })
        });

        AppView {
            view: self.view,
            topic: self.topic.clone(),
            graph: self
                .session
                .as_ref()
                .map(|s| GraphOutput::render(&s.graph, &s.layout)),
            selected,
            last_result: self.last_result,
            notice: self.notice.clone(),
        }
    }
}

pub fn reduce(state: &AppState, action: Action, cfg: &LayoutConfig) -> AppState {
    debug!(?action, "reduce");

    match action {
        Action::SubmitTopic { topic } => {
            let topic = topic.trim();
            if topic.is_empty() {
                return state.with_notice(Notice::error("Enter a topic to explore."));
            }
            AppState {
                view: View::Loading,
                topic: Some(topic.to_string()),
                notice: None,
                ..state.clone()
            }
        }

        Action::TopicLoaded { topic, mut bundle } => {
            if state.view != View::Loading || state.topic.as_deref() != Some(topic.trim()) {
                debug!(%topic, pending = ?state.topic, "ignoring stale topic load");
                return state.clone();
            }
            if bundle.topic.is_empty() {
                bundle.topic = state.topic.clone().unwrap_or_default();
            }
            match TopicSession::open(bundle, cfg) {
                Ok(session) => AppState {
                    view: View::Graph,
                    topic: Some(session.topic.clone()),
                    session: Some(session),
                    selected: None,
                    last_result: None,
                    notice: None,
                },
                Err(e) => {
                    warn!(error = %e, "topic rejected");
                    AppState {
                        view: state.settled_view(),
                        notice: Some(Notice::error(e.to_string())),
                        ..state.clone()
                    }
                }
            }
        }

        Action::TopicFailed { message } => AppState {
            view: state.settled_view(),
            notice: Some(Notice::error(message)),
            ..state.clone()
        },

        Action::SnapshotRestored { snapshot } => {
            // A snapshot without content only restores over the same loaded topic
            let content = match snapshot.node_content {
                Some(content) => content,
                None => match state.session.as_ref().filter(|s| s.topic == snapshot.topic) {
                    Some(session) => session.content.clone(),
                    None => {
                        warn!(topic = %snapshot.topic, "snapshot has no content and topic is not loaded");
                        return state.with_notice(Notice::error(format!(
                            "No quiz content for {}. Load the topic first.",
                            snapshot.topic
                        )));
                    }
                },
            };
            let bundle = TopicBundle {
                topic: snapshot.topic,
                graph: snapshot.graph,
                node_content: content,
            };
            match TopicSession::open(bundle, cfg) {
                Ok(session) => AppState {
                    view: View::Graph,
                    topic: Some(session.topic.clone()),
                    session: Some(session),
                    selected: None,
                    last_result: None,
                    notice: None,
                },
                Err(e) => state.with_notice(Notice::error(e.to_string())),
            }
        }

        Action::SelectNode { id } => {
            let Some(session) = &state.session else {
                return state.with_notice(Notice::error("No topic loaded."));
            };
            match session.graph.node(&id) {
                None => state.with_notice(Notice::error(format!("Unknown concept: {id}"))),
                Some(node) if !node.unlocked => state.with_notice(Notice::info(LOCKED_MESSAGE)),
                Some(_) => AppState {
                    selected: Some(id),
                    last_result: None,
                    notice: None,
                    ..state.clone()
                },
            }
        }

        Action::CloseNode => AppState {
            selected: None,
            last_result: None,
            ..state.clone()
        },

        Action::SubmitAnswer { answer } => submit_answer(state, answer),

        Action::DismissNotice => AppState {
            notice: None,
            ..state.clone()
        },

        Action::Reset => AppState::default(),
    }
}

fn submit_answer(state: &AppState, answer: Option<usize>) -> AppState {
    let (Some(session), Some(id)) = (&state.session, &state.selected) else {
        return state.with_notice(Notice::error("Select a concept first."));
    };

    let result = grade(session.content.get(id), answer);
    let outcome = match apply_attempt(&session.graph, id, result.passed) {
        Ok(outcome) => outcome,
        Err(e) => return state.with_notice(Notice::error(Error::from(e).to_string())),
    };

    let notice = if !result.passed {
        Notice::info("Not quite. Try again.")
    } else if outcome.changes.newly_unlocked.is_empty() {
        let label = outcome.graph.node(id).map(|n| n.label.as_str()).unwrap_or(id.as_str());
        Notice::info(format!("Completed {label}."))
    } else {
        let labels: Vec<&str> = outcome
            .changes
            .newly_unlocked
            .iter()
            .filter_map(|u| outcome.graph.node(u).map(|n| n.label.as_str()))
            .collect();
        Notice::info(format!("Unlocked: {}", labels.join(", ")))
    };

    AppState {
        session: Some(TopicSession {
            graph: outcome.graph,
            ..session.clone()
        }),
        last_result: Some(result),
        notice: Some(notice),
        ..state.clone()
    }
}

/// Serializable view of the whole state, for the host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppView {
    pub view: View,
    pub topic: Option<String>,
    pub graph: Option<GraphOutput>,
    pub selected: Option<SelectedView>,
    pub last_result: Option<QuizResult>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedView {
    pub id: String,
    pub label: String,
    pub completed: bool,
    pub content: String,
    pub quiz: Option<QuizView>,
}

/// A quiz without its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub question: String,
    pub options: Vec<String>,
}
