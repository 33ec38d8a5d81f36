//! Topic content: the graph plus what each node shows.
//!
//! A `ContentProvider` turns a topic name into a `TopicBundle`. The built-in
//! `StaticCatalog` ships one topic; remote services return the same JSON
//! shape, parsed with `TopicBundle::from_json` once the host has fetched it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ContentError;
use crate::graph::{EdgeSpec, GraphSpec, NodeSpec};
use crate::quiz::{NodeContent, Quiz};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicBundle {
    #[serde(default)]
    pub topic: String,
    #[serde(flatten)]
    pub graph: GraphSpec,
    #[serde(default, rename = "nodeContent")]
    pub node_content: BTreeMap<String, NodeContent>,
}

impl TopicBundle {
    pub fn from_json(body: &str) -> Result<TopicBundle, ContentError> {
        let bundle: TopicBundle = serde_json::from_str(body)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check quizzes and that every content entry belongs to a node.
    /// Graph structure is checked separately by `Graph::build`.
    pub fn validate(&self) -> Result<(), ContentError> {
        let ids: HashSet<&str> = self.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for (id, content) in &self.node_content {
            if !ids.contains(id.as_str()) {
                return Err(ContentError::OrphanContent(id.clone()));
            }
            if let Some(quiz) = &content.quiz {
                quiz.validate(id)?;
            }
        }
        Ok(())
    }

    pub fn content(&self, id: &str) -> Option<&NodeContent> {
        self.node_content.get(id)
    }
}

pub trait ContentProvider {
    fn fetch_topic(&self, topic: &str) -> Result<TopicBundle, ContentError>;
}

/// Built-in topics, available without a backend.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    topics: Vec<CatalogEntry>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    key: &'static str,
    bundle: TopicBundle,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self {
            topics: vec![CatalogEntry {
                key: "ai",
                bundle: artificial_intelligence(),
            }],
        }
    }
}

impl StaticCatalog {
    /// Titles of the built-in topics.
    pub fn topics(&self) -> Vec<&str> {
        self.topics.iter().map(|e| e.bundle.topic.as_str()).collect()
    }
}

impl ContentProvider for StaticCatalog {
    fn fetch_topic(&self, topic: &str) -> Result<TopicBundle, ContentError> {
        let wanted = topic.trim().to_lowercase();
        let entry = self
            .topics
            .iter()
            .find(|e| e.key == wanted || e.bundle.topic.to_lowercase() == wanted)
            .ok_or_else(|| ContentError::UnknownTopic(topic.trim().to_string()))?;

        debug!(topic = %entry.bundle.topic, "serving built-in topic");
        Ok(entry.bundle.clone())
    }
}

// ============================================================================
// Built-in topic: Artificial Intelligence
// ============================================================================

/// (id, label, level, unlocked from the start, summary)
const AI_NODES: &[(&str, &str, u32, bool, &str)] = &[
    ("AI", "Artificial Intelligence", 0, true, "Building systems that perform tasks which normally need human judgement."),
    ("ML", "Machine Learning", 1, true, "Algorithms that improve at a task by learning patterns from data."),
    ("Stats", "Statistics & Probability", 1, false, "Distributions, estimation and inference: the language models are written in."),
    ("DL", "Deep Learning", 2, false, "Learning layered representations with many-layer neural networks."),
    ("CV", "Computer Vision", 2, false, "Extracting meaning from images and video."),
    ("NLP", "Natural Language Processing", 2, false, "Understanding and generating human language."),
    ("RL", "Reinforcement Learning", 2, false, "Learning behaviour from rewards through trial and error."),
    ("DS", "Data Structures & Algos", 2, false, "The building blocks every efficient pipeline relies on."),
    ("NN", "Neural Networks", 3, false, "Weighted layers of units trained by gradient descent."),
    ("CNN", "Convolutional Networks", 3, false, "Networks that share filters across space, suited to images."),
    ("RNN", "Recurrent Networks", 3, false, "Networks with state that process sequences step by step."),
    ("GAN", "Generative Adversarial Nets", 3, false, "A generator and a discriminator trained against each other."),
    ("Clust", "Clustering & Regressions", 3, false, "Grouping unlabeled data and fitting continuous targets."),
    ("Transf", "Transformers (Attention)", 4, false, "Attention-based sequence models behind modern language models."),
    ("Agent", "AI Agents & Planning", 4, false, "Systems that perceive, plan and act towards goals."),
    ("Ethics", "AI Ethics & Governance", 4, false, "Fairness, accountability and the rules around deployed AI."),
];

const AI_LINKS: &[(&str, &str)] = &[
    ("AI", "ML"),
    ("AI", "Stats"),
    ("AI", "DS"),
    ("ML", "DL"),
    ("Stats", "DL"),
    ("ML", "Clust"),
    ("DL", "NN"),
    ("NN", "GAN"),
    ("DL", "CV"),
    ("DL", "NLP"),
    ("DL", "RL"),
    ("CV", "CNN"),
    ("NLP", "RNN"),
    ("RNN", "Transf"),
    ("RL", "Agent"),
    ("Agent", "Ethics"),
    ("Transf", "Ethics"),
];

fn quiz(question: &str, options: [&str; 4], answer_index: usize) -> Quiz {
    Quiz {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer_index,
    }
}

fn artificial_intelligence() -> TopicBundle {
    let nodes = AI_NODES
        .iter()
        .map(|&(id, label, level, unlocked, _)| {
            let spec = NodeSpec::new(id, label, level);
            if unlocked { spec.unlocked() } else { spec }
        })
        .collect();
    let links = AI_LINKS.iter().map(|&(s, t)| EdgeSpec::new(s, t)).collect();

    let mut node_content: BTreeMap<String, NodeContent> = AI_NODES
        .iter()
        .map(|&(id, _, _, _, summary)| {
            (id.to_string(), NodeContent { content: summary.to_string(), quiz: None })
        })
        .collect();

    let quizzes = [
        (
            "AI",
            quiz(
                "What is Artificial Intelligence?",
                [
                    "A system that performs logical reasoning only",
                    "A system that mimics human-like decision making",
                    "A program that runs only on quantum computers",
                    "A database for large-scale analytics",
                ],
                1,
            ),
        ),
        (
            "ML",
            quiz(
                "Which of the following best describes Machine Learning?",
                [
                    "Manually programmed rule-based systems",
                    "A subset of AI that learns from data",
                    "A branch of physics studying motion",
                    "A graphics rendering technique",
                ],
                1,
            ),
        ),
        (
            "DL",
            quiz(
                "Deep Learning mainly uses:",
                [
                    "Linear regression models",
                    "Neural networks with many layers",
                    "Genetic algorithms",
                    "Symbolic logic",
                ],
                1,
            ),
        ),
    ];
    for (id, q) in quizzes {
        if let Some(entry) = node_content.get_mut(id) {
            entry.quiz = Some(q);
        }
    }

    TopicBundle {
        topic: "Artificial Intelligence".to_string(),
        graph: GraphSpec { nodes, links },
        node_content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_catalog_lookup() {
        let catalog = StaticCatalog::default();
        let by_key = catalog.fetch_topic(" AI ").unwrap();
        let by_title = catalog.fetch_topic("artificial intelligence").unwrap();
        assert_eq!(by_key, by_title);
        assert_eq!(catalog.topics(), vec!["Artificial Intelligence"]);

        assert!(matches!(catalog.fetch_topic("Cooking"), Err(ContentError::UnknownTopic(t)) if t == "Cooking"));
    }

    #[test]
    fn test_builtin_topic_is_valid() {
        let bundle = StaticCatalog::default().fetch_topic("ai").unwrap();
        bundle.validate().unwrap();

        let graph = Graph::build(bundle.graph.clone()).unwrap();
        assert_eq!(graph.len(), 16);
        assert_eq!(graph.edges().len(), 17);
        // DL needs both ML and Stats
        let dl = graph.node_id("DL").unwrap();
        assert_eq!(graph.adjacency().in_degree(dl), 2);
        assert!(bundle.content("DL").unwrap().quiz.is_some());
        assert!(bundle.content("GAN").unwrap().quiz.is_none());
    }

    #[test]
    fn test_from_json() {
        let body = r#"{
            "topic": "Rust",
            "nodes": [
                { "id": "rust", "label": "Rust", "level": 0 },
                { "id": "own", "label": "Ownership", "level": 1 }
            ],
            "links": [{ "source": { "id": "rust" }, "target": "own" }],
            "nodeContent": {
                "own": {
                    "content": "Each value has one owner.",
                    "quiz": { "question": "How many owners?", "options": ["one", "two"], "answerIndex": 0 }
                }
            }
        }"#;
        let bundle = TopicBundle::from_json(body).unwrap();
        assert_eq!(bundle.topic, "Rust");
        assert_eq!(bundle.graph.links, vec![EdgeSpec::new("rust", "own")]);
        assert_eq!(bundle.content("own").unwrap().quiz.as_ref().unwrap().answer_index, 0);
    }

    #[test]
    fn test_from_json_rejects_orphan_content_and_bad_json() {
        let orphan = r#"{ "nodes": [], "links": [], "nodeContent": { "ghost": { "content": "boo" } } }"#;
        assert!(matches!(TopicBundle::from_json(orphan), Err(ContentError::OrphanContent(id)) if id == "ghost"));

        assert!(matches!(TopicBundle::from_json("{ nodes"), Err(ContentError::Parse(_))));
    }
}
