//! Loading graph and survey documents into the canonical model.
//!
//! Both survey revisions are resolved here, once, so nothing downstream has
//! to know which exporter produced the data.

mod raw;

use crate::analysis::{GraphError, SimilarityGraph};
use crate::fs::FileSystem;
use crate::model::{Edge, Node, PrecomputedCluster, Question, ResponseOption, SurveyDetail};
use raw::{RawGraph, RawNumber, RawResponse, RawSurveyEntry};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid {document} document: {source}")]
    Json {
        document: String,
        source: serde_json::Error,
    },
    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

/// Everything the analysis and the visualization need about one dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub graph: SimilarityGraph,
    /// Survey metadata by node id. Nodes without survey data are absent.
    pub details: HashMap<String, SurveyDetail>,
    pub precomputed: Vec<PrecomputedCluster>,
}

impl Dataset {
    /// Parse a graph document and an optional survey document.
    pub fn from_json(graph_json: &str, survey_json: Option<&str>) -> Result<Self, InputError> {
        let raw: RawGraph = serde_json::from_str(graph_json).map_err(|source| InputError::Json {
            document: "graph".to_string(),
            source,
        })?;

        let mut details = match survey_json {
            Some(text) => parse_survey(text)?,
            None => HashMap::new(),
        };

        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for raw_node in raw.nodes {
            let id = raw_node.id.into_string();
            let detail = details.get(&id);

            let size = match (raw_node.size, detail.and_then(|d| d.sample_size)) {
                (Some(size), _) if size.is_finite() && size >= 0.0 => size,
                (Some(size), fallback) => {
                    warn!(node = %id, size, "Ignoring invalid node size");
                    fallback.map(|s| s as f64).unwrap_or(1.0)
                }
                (None, Some(sample)) => sample as f64,
                (None, None) => 1.0,
            };
            let topic = raw_node
                .topic
                .or_else(|| detail.and_then(|d| d.topic.clone()));
            let questions = detail
                .map(|d| d.questions.iter().map(|q| q.text.clone()).collect())
                .unwrap_or_default();

            // Graph-only datasets still get searchable options
            if detail.is_none()
                && let Some(options) = raw_node.options
            {
                details.insert(
                    id.clone(),
                    SurveyDetail {
                        survey_name: raw_node.survey_name,
                        sample_size: None,
                        topic: topic.clone(),
                        questions: vec![Question {
                            text: id.clone(),
                            responses: options
                                .into_vec()
                                .into_iter()
                                .map(|option| ResponseOption { option, share: 0.0 })
                                .collect(),
                        }],
                    },
                );
            }

            nodes.push(Node {
                id,
                size,
                topic,
                keywords: raw_node.keywords,
                questions,
                cluster_id: raw_node.cluster_id.map(|c| c.into_string()),
            });
        }

        let edges = raw
            .links
            .into_iter()
            .map(|e| Edge::new(e.source.into_string(), e.target.into_string(), e.strength))
            .collect();

        let precomputed = raw
            .clusters
            .into_iter()
            .map(|c| {
                let id = c.id.into_string();
                PrecomputedCluster {
                    label: c.label.unwrap_or_else(|| id.clone()),
                    id,
                    size: c.size,
                }
            })
            .collect();

        let graph = SimilarityGraph::new(nodes, edges)?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            surveys = details.len(),
            "Loaded dataset"
        );

        Ok(Self {
            graph,
            details,
            precomputed,
        })
    }
}

pub fn load_dataset(
    fs: &dyn FileSystem,
    graph_path: &Path,
    survey_path: Option<&Path>,
) -> Result<Dataset, InputError> {
    let read = |path: &Path| {
        fs.read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let graph_json = read(graph_path)?;
    let survey_json = survey_path.map(read).transpose()?;

    Dataset::from_json(&graph_json, survey_json.as_deref()).map_err(|e| match e {
        InputError::Json { document, source } => {
            let path = if document == "graph" {
                Some(graph_path)
            } else {
                survey_path
            };
            InputError::Json {
                document: path.map_or(document, |p| p.display().to_string()),
                source,
            }
        }
        other => other,
    })
}

fn parse_survey(text: &str) -> Result<HashMap<String, SurveyDetail>, InputError> {
    let entries: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| InputError::Json {
            document: "survey".to_string(),
            source,
        })?;

    let mut details = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        match serde_json::from_value::<RawSurveyEntry>(value) {
            Ok(entry) => {
                details.insert(key.clone(), resolve_entry(&key, entry));
            }
            Err(e) => warn!(entry = %key, error = %e, "Skipping unrecognized survey entry"),
        }
    }
    Ok(details)
}

fn resolve_entry(key: &str, entry: RawSurveyEntry) -> SurveyDetail {
    match entry {
        RawSurveyEntry::Topic(t) => {
            let questions = t
                .questions
                .into_iter()
                .filter_map(|(text, value)| {
                    match serde_json::from_value::<Vec<RawResponse>>(value) {
                        Ok(responses) => Some(Question {
                            responses: resolve_responses(key, responses),
                            text,
                        }),
                        Err(e) => {
                            warn!(entry = %key, question = %text, error = %e, "Skipping question");
                            None
                        }
                    }
                })
                .collect();
            SurveyDetail {
                survey_name: t.survey_name,
                sample_size: t.sample_size.as_ref().and_then(|n| sample_size(key, n)),
                topic: t.topic,
                questions,
            }
        }
        RawSurveyEntry::Question(q) => SurveyDetail {
            survey_name: q.survey_name,
            sample_size: q.sample_size.as_ref().and_then(|n| sample_size(key, n)),
            topic: q.topic,
            questions: vec![Question {
                text: key.to_string(),
                responses: resolve_responses(key, q.responses),
            }],
        },
    }
}

fn resolve_responses(key: &str, responses: Vec<RawResponse>) -> Vec<ResponseOption> {
    responses
        .into_iter()
        .map(|r| ResponseOption {
            share: r
                .percentage
                .as_ref()
                .map_or(0.0, |p| share(key, &r.option, p)),
            option: r.option,
        })
        .collect()
}

/// Shares are fractions; anything written as a percent or above 1 is scaled.
fn share(key: &str, option: &str, raw: &RawNumber) -> f64 {
    match raw.parse() {
        Some((value, percent)) => {
            let value = if percent || value > 1.0 {
                value / 100.0
            } else {
                value
            };
            value.clamp(0.0, 1.0)
        }
        None => {
            warn!(entry = %key, option, "Unreadable percentage, using 0");
            0.0
        }
    }
}

fn sample_size(key: &str, raw: &RawNumber) -> Option<u64> {
    match raw.parse() {
        Some((value, _)) if value >= 0.0 => Some(value.round() as u64),
        _ => {
            warn!(entry = %key, "Unreadable sample size");
            None
        }
    }
}
