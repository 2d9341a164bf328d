mod adjacency;
mod cluster;
mod graph;
mod label;
mod placement;

pub use adjacency::{AdjacencyIndex, Neighbor};
pub use cluster::{ClusterBuilder, ClusterError, ClusterOptions, ClusterStrategy};
pub use graph::{GraphError, SimilarityGraph};
pub use label::{ClusterLabeler, DEFAULT_DOMAINS, DEFAULT_STOP_WORDS, Domain, LabelOptions};
pub use placement::{
    LabelCandidate, PlacementOptions, PlacementResolver, PlacementStrategy, ZoomStyle, candidates,
};

use crate::config::Config;
use crate::model::{ClusterReport, Placement, PositionSnapshot, PrecomputedCluster};

/// Cluster and label a graph with the configured options.
pub fn analyze(
    graph: &SimilarityGraph,
    precomputed: &[PrecomputedCluster],
    config: &Config,
) -> Result<ClusterReport, ClusterError> {
    // Partition first so bad options are rejected before labeling
    let partition = ClusterBuilder::new(config.clustering.clone()).build(graph)?;

    let labels = ClusterLabeler::new(config.labels.clone()).label_all(&partition, graph, precomputed);

    Ok(ClusterReport {
        total_nodes: graph.node_count(),
        total_edges: graph.edge_count(),
        components: graph.component_count(),
        partition,
        labels,
    })
}

/// Place the report's cluster labels for one snapshot of node positions.
pub fn place_labels(
    report: &ClusterReport,
    positions: &PositionSnapshot,
    zoom: f64,
    options: &PlacementOptions,
) -> Vec<Placement> {
    let found = candidates(&report.partition, &report.labels, positions);
    PlacementResolver::new(options.clone()).place_at_zoom(&found, zoom)
}
