//! Wire shapes of the graph and survey documents as produced upstream.
//!
//! Nothing here leaves the `input` module; everything is resolved onto the
//! canonical model in `super`.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(super) struct RawGraph {
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<RawEdge>,
    #[serde(default)]
    pub clusters: Vec<RawCluster>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawNode {
    pub id: RawId,
    pub size: Option<f64>,
    pub topic: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub cluster_id: Option<RawId>,
    pub survey_name: Option<String>,
    pub options: Option<RawOptions>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEdge {
    pub source: RawId,
    pub target: RawId,
    pub strength: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCluster {
    pub id: RawId,
    pub label: Option<String>,
    pub size: Option<usize>,
}

/// Ids show up as strings or bare numbers depending on the exporter.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Answer options as a `" | "`-joined string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawOptions {
    Joined(String),
    List(Vec<String>),
}

impl RawOptions {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RawOptions::Joined(s) => s
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            RawOptions::List(v) => v,
        }
    }
}

/// One survey document entry. The topic revision groups several questions
/// under a topic; the question revision is keyed by the question itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawSurveyEntry {
    Topic(RawTopicEntry),
    Question(RawQuestionEntry),
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTopicEntry {
    #[serde(rename = "Survey Name")]
    pub survey_name: Option<String>,
    #[serde(rename = "Sample Size")]
    pub sample_size: Option<RawNumber>,
    #[serde(rename = "Topic")]
    pub topic: Option<String>,
    /// Question text → responses, in document order.
    #[serde(rename = "Questions")]
    pub questions: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawQuestionEntry {
    #[serde(rename = "Survey Name")]
    pub survey_name: Option<String>,
    #[serde(rename = "Sample Size")]
    pub sample_size: Option<RawNumber>,
    #[serde(rename = "Topic")]
    pub topic: Option<String>,
    #[serde(rename = "Responses")]
    pub responses: Vec<RawResponse>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawResponse {
    #[serde(rename = "Option")]
    pub option: String,
    #[serde(rename = "Percentage", default)]
    pub percentage: Option<RawNumber>,
}

/// Numbers that may arrive quoted, e.g. `"45%"` or `"1,200"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Parsed value and whether it was written as a percentage.
    pub fn parse(&self) -> Option<(f64, bool)> {
        match self {
            RawNumber::Number(n) => n.is_finite().then_some((*n, false)),
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                let (digits, percent) = match trimmed.strip_suffix('%') {
                    Some(rest) => (rest.trim(), true),
                    None => (trimmed, false),
                };
                let value: f64 = digits.replace(',', "").parse().ok()?;
                value.is_finite().then_some((value, percent))
            }
        }
    }
}
