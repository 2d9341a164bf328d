mod cluster;
mod geometry;
mod node;
mod survey;

pub use cluster::{Cluster, ClusterLabels, Partition};
pub use geometry::{Placement, Point, PositionSnapshot, Rect};
pub use node::{Edge, Node, PrecomputedCluster};
pub use survey::{Question, ResponseOption, SurveyDetail};

use serde::Serialize;

/// Everything derived from one clustering run over a loaded graph.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub partition: Partition,
    pub labels: ClusterLabels,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Connected components of the similarity graph, ignoring strength.
    pub components: usize,
}
