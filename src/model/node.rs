use serde::{Deserialize, Serialize};

/// A survey question or topic in the similarity graph.
///
/// Positions are deliberately absent: the layout engine owns them and hands
/// them over as a [`PositionSnapshot`](super::PositionSnapshot).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    /// Sample size backing this node; drives the rendered radius.
    pub size: f64,
    pub topic: Option<String>,
    /// Precomputed keywords. Empty when the source had none.
    pub keywords: Vec<String>,
    /// Question texts from the survey, in document order.
    #[serde(default)]
    pub questions: Vec<String>,
    /// Cluster assignment carried by the source data, if any.
    pub cluster_id: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: 1.0,
            topic: None,
            keywords: Vec::new(),
            questions: Vec::new(),
            cluster_id: None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_questions<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.questions = questions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cluster_id(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }
}

/// Undirected similarity link between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Similarity in `[0, 1]`.
    pub strength: f64,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, strength: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength,
        }
    }
}

/// A cluster definition shipped alongside the graph by an upstream pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrecomputedCluster {
    pub id: String,
    pub label: String,
    pub size: Option<usize>,
}
