use super::style;
use crate::analysis::PlacementOptions;
use crate::input::Dataset;
use crate::model::{ClusterReport, Question};
use serde::Serialize;

/// Everything the browser page needs to draw the graph, in D3 force-layout shape.
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub clusters: Vec<GraphCluster>,
    pub metadata: GraphMetadata,
    /// Text metrics for pages that resolve placements without the server.
    pub label_metrics: LabelMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub topic: Option<String>,
    pub survey_name: Option<String>,
    pub sample_size: Option<u64>,
    pub size: f64,
    pub radius: f64,
    pub color: String,
    pub confidence_color: String,
    pub cluster: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphCluster {
    pub id: String,
    pub label: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    pub title: String,
    pub total_nodes: usize,
    pub total_links: usize,
    pub total_clusters: usize,
    pub labelled_clusters: usize,
    pub components: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    pub base_font_size: f64,
}

impl From<&PlacementOptions> for LabelMetrics {
    fn from(options: &PlacementOptions) -> Self {
        Self {
            char_width: options.char_width,
            line_height: options.line_height,
            padding: options.padding,
            base_font_size: options.base_font_size,
        }
    }
}

impl GraphData {
    pub fn build(
        dataset: &Dataset,
        report: &ClusterReport,
        placement: &PlacementOptions,
        title: &str,
    ) -> Self {
        let graph = &dataset.graph;
        let max_size = graph.max_size();

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let detail = dataset.details.get(&node.id);
                GraphNode {
                    id: node.id.clone(),
                    topic: node.topic.clone(),
                    survey_name: detail.and_then(|d| d.survey_name.clone()),
                    sample_size: detail.and_then(|d| d.sample_size),
                    size: node.size,
                    radius: style::radius(node.size, max_size),
                    color: style::fill_color(detail),
                    confidence_color: style::confidence_color(detail.and_then(|d| d.confidence()))
                        .to_string(),
                    cluster: report.partition.cluster_of(&node.id).map(|c| c.id.clone()),
                    questions: detail.map(|d| d.questions.clone()).unwrap_or_default(),
                }
            })
            .collect();

        let links = graph
            .edges()
            .iter()
            .map(|e| GraphLink {
                source: e.source.clone(),
                target: e.target.clone(),
                strength: e.strength,
            })
            .collect();

        let clusters: Vec<GraphCluster> = report
            .partition
            .iter()
            .map(|c| GraphCluster {
                id: c.id.clone(),
                label: report.labels.label(&c.id).map(str::to_string),
                members: c.members.clone(),
            })
            .collect();

        let metadata = GraphMetadata {
            title: title.to_string(),
            total_nodes: report.total_nodes,
            total_links: report.total_edges,
            total_clusters: clusters.len(),
            labelled_clusters: report.labels.len(),
            components: report.components,
        };

        Self {
            nodes,
            links,
            clusters,
            metadata,
            label_metrics: LabelMetrics::from(placement),
        }
    }
}
