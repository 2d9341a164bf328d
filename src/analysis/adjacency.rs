use crate::analysis::GraphError;
use crate::model::{Edge, Node};
use std::collections::HashMap;

/// One incident edge seen from a node: the other endpoint (by input index)
/// and the edge strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub node: usize,
    pub strength: f64,
}

/// Node → incident (neighbor, strength) pairs, derived from the edge list.
///
/// Parallel edges are kept as separate entries and a self-loop shows up
/// twice on its node; nothing is deduplicated or normalized.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    ids: Vec<String>,
    index_by_id: HashMap<String, usize>,
    entries: Vec<Vec<Neighbor>>,
}

impl AdjacencyIndex {
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Result<Self, GraphError> {
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let index_by_id: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        let mut entries = vec![Vec::new(); nodes.len()];

        for edge in edges {
            let resolve = |id: &str| {
                index_by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::InvalidEdge {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                        missing: id.to_string(),
                    })
            };
            let u = resolve(&edge.source)?;
            let v = resolve(&edge.target)?;

            entries[u].push(Neighbor {
                node: v,
                strength: edge.strength,
            });
            entries[v].push(Neighbor {
                node: u,
                strength: edge.strength,
            });
        }

        Ok(Self {
            ids,
            index_by_id,
            entries,
        })
    }

    /// Neighbors of the node with the given id, `None` for unknown ids.
    pub fn neighbors(&self, id: &str) -> Option<&[Neighbor]> {
        self.index_by_id
            .get(id)
            .map(|&index| self.entries[index].as_slice())
    }

    /// Neighbors of the node at input position `index`.
    pub fn neighbors_at(&self, index: usize) -> &[Neighbor] {
        self.entries.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Id of the node at input position `index`.
    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Neighbor ids with strengths, resolved for display.
    pub fn neighbor_ids(&self, id: &str) -> Vec<(&str, f64)> {
        self.neighbors(id)
            .unwrap_or(&[])
            .iter()
            .filter_map(|n| self.id(n.node).map(|nid| (nid, n.strength)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
