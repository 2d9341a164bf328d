use crate::analysis::AdjacencyIndex;
use crate::model::{Edge, Node};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Edge {source_id} -> {target_id} references unknown node: {missing}")]
    InvalidEdge {
        source_id: String,
        target_id: String,
        missing: String,
    },
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("Edge {source_id} -> {target_id} has strength {strength} outside [0, 1]")]
    InvalidStrength {
        source_id: String,
        target_id: String,
        strength: f64,
    },
}

/// Validated similarity graph: nodes, weighted edges and the derived
/// adjacency index. Immutable once built.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    graph: UnGraph<String, f64>,
    node_indices: HashMap<String, NodeIndex>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adjacency: AdjacencyIndex,
}

impl SimilarityGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut node_indices = HashMap::with_capacity(nodes.len());

        for node in &nodes {
            if node_indices.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in &edges {
            if !(0.0..=1.0).contains(&edge.strength) {
                return Err(GraphError::InvalidStrength {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    strength: edge.strength,
                });
            }
            let from = lookup(&node_indices, edge, &edge.source)?;
            let to = lookup(&node_indices, edge, &edge.target)?;
            graph.add_edge(from, to, edge.strength);
        }

        let adjacency = AdjacencyIndex::build(&nodes, &edges)?;

        Ok(Self {
            graph,
            node_indices,
            nodes,
            edges,
            adjacency,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_indices
            .get(id)
            .map(|idx| &self.nodes[idx.index()])
    }

    /// Position of `id` in the input node list.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_indices.get(id).map(|idx| idx.index())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct direct neighbors of `id`, in no particular order.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };

        let mut seen: Vec<&str> = Vec::new();
        for neighbor in self.graph.neighbors(idx) {
            let neighbor_id = self.graph[neighbor].as_str();
            if !seen.contains(&neighbor_id) {
                seen.push(neighbor_id);
            }
        }
        seen
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    pub fn max_size(&self) -> f64 {
        self.nodes.iter().map(|n| n.size).fold(0.0, f64::max)
    }
}

fn lookup(
    node_indices: &HashMap<String, NodeIndex>,
    edge: &Edge,
    id: &str,
) -> Result<NodeIndex, GraphError> {
    node_indices
        .get(id)
        .copied()
        .ok_or_else(|| GraphError::InvalidEdge {
            source_id: edge.source.clone(),
            target_id: edge.target.clone(),
            missing: id.to_string(),
        })
}
