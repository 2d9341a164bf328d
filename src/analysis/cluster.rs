//! Greedy agglomerative clustering over the similarity graph.
//!
//! The canonical strategy is [`ClusterStrategy::IterativeMerge`]: strong
//! edges are visited in descending strength order and the smaller cluster is
//! merged into the larger, subject to a size cap and a coherence gate. The
//! result is order-dependent and not globally optimal; for identical input it
//! is always the same.

use crate::analysis::SimilarityGraph;
use crate::model::{Cluster, Partition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Highest level visited by the threshold sweep.
const SWEEP_START: f64 = 0.8;

#[derive(Debug, Error, PartialEq)]
pub enum ClusterError {
    #[error("Strength threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("Maximum cluster size must be at least 1, got {0}")]
    InvalidCapacity(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStrategy {
    /// Repeated descending-strength merge passes with size cap and coherence gate
    #[default]
    Merge,
    /// Single pass per threshold level, seeding clusters in input order
    Sweep,
    /// Use the `cluster_id` carried by the input nodes
    Precomputed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    pub strategy: ClusterStrategy,
    /// Minimum edge strength that may join two clusters.
    pub threshold: f64,
    /// Maximum members per cluster.
    pub max_size: usize,
    /// Require `max(1, min(|A|, |B|) / 3)` strong links before merging A and B.
    pub coherence: bool,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            strategy: ClusterStrategy::Merge,
            threshold: 0.7,
            max_size: 20,
            coherence: true,
        }
    }
}

impl ClusterOptions {
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClusterError::InvalidThreshold(self.threshold));
        }
        if self.max_size < 1 {
            return Err(ClusterError::InvalidCapacity(self.max_size));
        }
        Ok(())
    }
}

pub struct ClusterBuilder {
    options: ClusterOptions,
}

impl ClusterBuilder {
    pub fn new(options: ClusterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Partition the graph. Options are validated before any work is done.
    pub fn build(&self, graph: &SimilarityGraph) -> Result<Partition, ClusterError> {
        self.options.validate()?;

        let partition = match self.options.strategy {
            ClusterStrategy::Merge => finalize(graph, self.iterative_merge(graph)),
            ClusterStrategy::Sweep => finalize(graph, self.threshold_sweep(graph)),
            ClusterStrategy::Precomputed => precomputed(graph),
        };

        debug!(
            strategy = ?self.options.strategy,
            clusters = partition.len(),
            singletons = partition.singleton_count(),
            "clustering complete"
        );

        Ok(partition)
    }

    fn iterative_merge(&self, graph: &SimilarityGraph) -> Vec<Vec<usize>> {
        let threshold = self.options.threshold;
        let max_size = self.options.max_size;
        let adjacency = graph.adjacency();
        let n = graph.node_count();

        let mut assignment: Vec<usize> = (0..n).collect();
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

        let mut strong: Vec<(usize, usize, f64)> = graph
            .edges()
            .iter()
            .filter(|e| e.strength >= threshold)
            .filter_map(|e| Some((graph.index_of(&e.source)?, graph.index_of(&e.target)?, e.strength)))
            .collect();
        // Stable sort: equal strengths keep input order
        strong.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

        let mut pass = 0;
        loop {
            pass += 1;
            let mut merges = 0;

            for &(u, v, _) in &strong {
                let a = assignment[u];
                let b = assignment[v];
                if a == b {
                    continue;
                }

                let size_a = members[a].len();
                let size_b = members[b].len();
                if size_a + size_b > max_size {
                    continue;
                }

                if self.options.coherence {
                    let (small, other) = if size_a <= size_b { (a, b) } else { (b, a) };
                    let links = members[small]
                        .iter()
                        .flat_map(|&m| adjacency.neighbors_at(m))
                        .filter(|nb| nb.strength >= threshold && assignment[nb.node] == other)
                        .count();
                    let required = (size_a.min(size_b) / 3).max(1);
                    if links < required {
                        continue;
                    }
                }

                // Smaller into larger; equal sizes fold into the lower id
                let (keep, absorb) = if size_a > size_b || (size_a == size_b && a < b) {
                    (a, b)
                } else {
                    (b, a)
                };
                let moved = std::mem::take(&mut members[absorb]);
                for &m in &moved {
                    assignment[m] = keep;
                }
                members[keep].extend(moved);
                merges += 1;
            }

            debug!(pass, merges, "merge pass");
            if merges == 0 {
                break;
            }
        }

        members.into_iter().filter(|m| !m.is_empty()).collect()
    }

    fn threshold_sweep(&self, graph: &SimilarityGraph) -> Vec<Vec<usize>> {
        let adjacency = graph.adjacency();
        let n = graph.node_count();
        let mut assigned = vec![false; n];
        let mut communities: Vec<Vec<usize>> = Vec::new();

        for level in sweep_levels(self.options.threshold) {
            for seed in 0..n {
                if assigned[seed] {
                    continue;
                }

                let mut community = vec![seed];
                for neighbor in adjacency.neighbors_at(seed) {
                    if community.len() >= self.options.max_size {
                        break;
                    }
                    if neighbor.strength >= level
                        && !assigned[neighbor.node]
                        && !community.contains(&neighbor.node)
                    {
                        community.push(neighbor.node);
                    }
                }

                // A seed that absorbed nobody stays available for lower levels
                if community.len() > 1 {
                    for &m in &community {
                        assigned[m] = true;
                    }
                    communities.push(community);
                }
            }
            debug!(level, clusters = communities.len(), "sweep level");
        }

        communities.extend((0..n).filter(|&i| !assigned[i]).map(|i| vec![i]));
        communities
    }
}

/// Descending sweep levels `0.8, 0.7, ...` down to and including `threshold`.
fn sweep_levels(threshold: f64) -> Vec<f64> {
    if threshold > SWEEP_START {
        return vec![threshold];
    }

    let mut levels: Vec<f64> = (0..=8)
        .rev()
        .map(|step| step as f64 / 10.0)
        .filter(|level| *level >= threshold - 1e-9)
        .collect();
    if levels.last().is_none_or(|last| (last - threshold).abs() > 1e-9) {
        levels.push(threshold);
    }
    levels
}

/// Sort members into input order, order clusters by their first member and
/// assign `cluster-{n}` ids.
fn finalize(graph: &SimilarityGraph, mut groups: Vec<Vec<usize>>) -> Partition {
    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_by_key(|g| g.first().copied().unwrap_or(usize::MAX));

    let clusters = groups
        .into_iter()
        .enumerate()
        .map(|(n, group)| Cluster {
            id: format!("cluster-{}", n),
            members: group
                .into_iter()
                .map(|i| graph.nodes()[i].id.clone())
                .collect(),
        })
        .collect();

    Partition::new(clusters)
}

/// Group nodes by their source `cluster_id`; nodes without one stand alone
/// under a generated id that never collides with a source id.
fn precomputed(graph: &SimilarityGraph) -> Partition {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut by_source_id: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<String> = graph
        .nodes()
        .iter()
        .filter_map(|n| n.cluster_id.clone())
        .collect();

    for (index, node) in graph.nodes().iter().enumerate() {
        match node.cluster_id.as_deref() {
            Some(source_id) => match by_source_id.get(source_id) {
                Some(&slot) => clusters[slot].members.push(node.id.clone()),
                None => {
                    by_source_id.insert(source_id, clusters.len());
                    clusters.push(Cluster {
                        id: source_id.to_string(),
                        members: vec![node.id.clone()],
                    });
                }
            },
            None => {
                let mut id = format!("unassigned-{}", index);
                let mut suffix = 1;
                while taken.contains(&id) {
                    id = format!("unassigned-{}-{}", index, suffix);
                    suffix += 1;
                }
                taken.insert(id.clone());
                clusters.push(Cluster {
                    id,
                    members: vec![node.id.clone()],
                });
            }
        }
    }

    Partition::new(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node};
    use std::collections::HashSet;

    fn graph(ids: &[&str], edges: &[(&str, &str, f64)]) -> SimilarityGraph {
        SimilarityGraph::new(
            ids.iter().map(|id| Node::new(*id)).collect(),
            edges
                .iter()
                .map(|(s, t, w)| Edge::new(*s, *t, *w))
                .collect(),
        )
        .unwrap()
    }

    fn chain() -> SimilarityGraph {
        graph(
            &["A", "B", "C", "D"],
            &[("A", "B", 0.9), ("B", "C", 0.85), ("C", "D", 0.1)],
        )
    }

    fn merge(threshold: f64, max_size: usize) -> ClusterBuilder {
        ClusterBuilder::new(ClusterOptions {
            strategy: ClusterStrategy::Merge,
            threshold,
            max_size,
            coherence: true,
        })
    }

    fn members(partition: &Partition) -> Vec<Vec<&str>> {
        partition
            .iter()
            .map(|c| c.members.iter().map(String::as_str).collect())
            .collect()
    }

    fn assert_partition(partition: &Partition, graph: &SimilarityGraph) {
        let mut seen = HashSet::new();
        for cluster in partition.iter() {
            assert!(!cluster.members.is_empty());
            for member in &cluster.members {
                assert!(seen.insert(member.clone()), "{} appears twice", member);
            }
        }
        assert_eq!(seen.len(), graph.node_count());
    }

    #[test]
    fn test_chain_of_strong_edges_merges() {
        let g = chain();
        let partition = merge(0.8, 10).build(&g).unwrap();

        assert_eq!(members(&partition), vec![vec!["A", "B", "C"], vec!["D"]]);
        assert_eq!(partition.cluster_of("C").unwrap().id, "cluster-0");
        assert_eq!(partition.cluster_of("D").unwrap().id, "cluster-1");
        assert_partition(&partition, &g);
    }

    #[test]
    fn test_threshold_above_all_strengths_gives_singletons() {
        let g = chain();
        let partition = merge(0.95, 10).build(&g).unwrap();

        assert_eq!(partition.len(), 4);
        assert_eq!(partition.singleton_count(), 4);
    }

    #[test]
    fn test_no_edges_gives_singletons() {
        let g = graph(&["x", "y", "z"], &[]);
        for strategy in [ClusterStrategy::Merge, ClusterStrategy::Sweep] {
            let options = ClusterOptions {
                strategy,
                ..Default::default()
            };
            let partition = ClusterBuilder::new(options).build(&g).unwrap();
            assert_eq!(partition.len(), 3);
        }
    }

    #[test]
    fn test_size_cap_is_respected() {
        // A 6-clique of very strong edges
        let ids = ["a", "b", "c", "d", "e", "f"];
        let mut edges = Vec::new();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                edges.push((ids[i], ids[j], 0.9));
            }
        }
        let g = graph(&ids, &edges);

        let partition = merge(0.5, 4).build(&g).unwrap();
        assert!(partition.iter().all(|c| c.size() <= 4));
        assert_partition(&partition, &g);

        let sweep = ClusterBuilder::new(ClusterOptions {
            strategy: ClusterStrategy::Sweep,
            threshold: 0.5,
            max_size: 4,
            coherence: true,
        })
        .build(&g)
        .unwrap();
        assert!(sweep.iter().all(|c| c.size() <= 4));
        assert_partition(&sweep, &g);
    }

    #[test]
    fn test_coherence_gate_blocks_single_stray_edge() {
        // Two 6-cliques joined by one strong bridge. Merging the cliques
        // needs max(1, 6 / 3) = 2 strong links; the lone bridge is not enough.
        let left = ["l1", "l2", "l3", "l4", "l5", "l6"];
        let right = ["r1", "r2", "r3", "r4", "r5", "r6"];
        let mut edges = Vec::new();
        for group in [&left, &right] {
            for i in 0..group.len() {
                for j in (i + 1)..group.len() {
                    edges.push((group[i], group[j], 0.95));
                }
            }
        }
        edges.push(("l1", "r1", 0.9));
        let ids: Vec<&str> = left.iter().chain(right.iter()).copied().collect();
        let g = graph(&ids, &edges);

        let gated = merge(0.8, 20).build(&g).unwrap();
        assert_eq!(gated.len(), 2);
        assert_eq!(gated.clusters()[0].size(), 6);

        let ungated = ClusterBuilder::new(ClusterOptions {
            coherence: false,
            ..merge(0.8, 20).options().clone()
        })
        .build(&g)
        .unwrap();
        assert_eq!(ungated.len(), 1);
    }

    #[test]
    fn test_higher_threshold_is_not_coarser() {
        let g = graph(
            &["a", "b", "c", "d", "e", "f"],
            &[
                ("a", "b", 0.95),
                ("b", "c", 0.75),
                ("c", "d", 0.55),
                ("d", "e", 0.35),
                ("e", "f", 0.15),
            ],
        );

        let mut previous = 0;
        for threshold in [0.1, 0.3, 0.5, 0.7, 0.9, 1.0] {
            let count = merge(threshold, 10).build(&g).unwrap().len();
            assert!(
                count >= previous,
                "threshold {} produced {} clusters, fewer than {}",
                threshold,
                count,
                previous
            );
            previous = count;
        }
        assert_eq!(previous, 6);
    }

    #[test]
    fn test_build_is_deterministic() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[
                ("a", "b", 0.8),
                ("c", "d", 0.8),
                ("b", "c", 0.8),
                ("d", "e", 0.8),
            ],
        );
        let builder = merge(0.5, 3);
        let first = builder.build(&g).unwrap();
        let second = builder.build(&g).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|c| c.size() <= 3));
    }

    #[test]
    fn test_rejects_invalid_options() {
        let g = chain();
        assert_eq!(
            merge(1.5, 10).build(&g).unwrap_err(),
            ClusterError::InvalidThreshold(1.5)
        );
        assert!(matches!(
            merge(f64::NAN, 10).build(&g),
            Err(ClusterError::InvalidThreshold(_))
        ));
        assert_eq!(
            merge(0.5, 0).build(&g).unwrap_err(),
            ClusterError::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_sweep_matches_chain_example() {
        let g = chain();
        let partition = ClusterBuilder::new(ClusterOptions {
            strategy: ClusterStrategy::Sweep,
            threshold: 0.8,
            max_size: 10,
            coherence: true,
        })
        .build(&g)
        .unwrap();

        // A seeds {A, B}; C is then seeded on its own and absorbs nothing
        // because B is already taken.
        assert_eq!(members(&partition), vec![vec!["A", "B"], vec!["C"], vec!["D"]]);
    }

    #[test]
    fn test_sweep_levels() {
        assert_eq!(sweep_levels(0.9), vec![0.9]);
        assert_eq!(sweep_levels(0.6), vec![0.8, 0.7, 0.6]);
        assert_eq!(sweep_levels(0.65), vec![0.8, 0.7, 0.65]);
    }

    #[test]
    fn test_precomputed_passes_through() {
        let nodes = vec![
            Node::new("a").with_cluster_id("7"),
            Node::new("b"),
            Node::new("c").with_cluster_id("7"),
        ];
        let g = SimilarityGraph::new(nodes, Vec::new()).unwrap();
        let partition = ClusterBuilder::new(ClusterOptions {
            strategy: ClusterStrategy::Precomputed,
            ..Default::default()
        })
        .build(&g)
        .unwrap();

        assert_eq!(members(&partition), vec![vec!["a", "c"], vec!["b"]]);
        assert_eq!(partition.cluster_of("c").unwrap().id, "7");
        assert_eq!(partition.cluster_of("b").unwrap().id, "unassigned-1");
    }

    #[test]
    fn test_precomputed_generated_ids_avoid_source_ids() {
        let nodes = vec![
            Node::new("a").with_cluster_id("unassigned-1"),
            Node::new("b"),
            Node::new("c").with_cluster_id("unassigned-1"),
        ];
        let g = SimilarityGraph::new(nodes, Vec::new()).unwrap();
        let partition = ClusterBuilder::new(ClusterOptions {
            strategy: ClusterStrategy::Precomputed,
            ..Default::default()
        })
        .build(&g)
        .unwrap();

        let ids: HashSet<&str> = partition.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), partition.len());
        assert_eq!(partition.get("unassigned-1").unwrap().members, vec!["a", "c"]);
        assert_eq!(partition.cluster_of("b").unwrap().id, "unassigned-1-1");
    }
}
