use serde::Serialize;
use std::collections::HashMap;

/// A group of closely related nodes. Members keep the graph's input order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub members: Vec<String>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// A strict partition of the node set into clusters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Partition {
    clusters: Vec<Cluster>,
    #[serde(skip)]
    cluster_by_node: HashMap<String, usize>,
}

impl Partition {
    /// Builds a partition from already disjoint clusters.
    pub fn new(clusters: Vec<Cluster>) -> Self {
        let mut cluster_by_node = HashMap::new();
        for (index, cluster) in clusters.iter().enumerate() {
            for member in &cluster.members {
                cluster_by_node.insert(member.clone(), index);
            }
        }

        Self {
            clusters,
            cluster_by_node,
        }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, cluster_id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    /// The cluster containing `node_id`.
    pub fn cluster_of(&self, node_id: &str) -> Option<&Cluster> {
        self.cluster_by_node
            .get(node_id)
            .map(|&index| &self.clusters[index])
    }

    pub fn singleton_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_singleton()).count()
    }

    /// Cluster id → member ids, the shape the rendering layer consumes.
    pub fn to_map(&self) -> HashMap<String, Vec<String>> {
        self.clusters
            .iter()
            .map(|c| (c.id.clone(), c.members.clone()))
            .collect()
    }
}

/// Display labels keyed by cluster id. Clusters without a label are absent.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ClusterLabels {
    labels: HashMap<String, String>,
}

impl ClusterLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cluster_id: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(cluster_id.into(), label.into());
    }

    pub fn label(&self, cluster_id: &str) -> Option<&str> {
        self.labels.get(cluster_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
