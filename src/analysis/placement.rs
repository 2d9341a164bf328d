//! Cluster label placement for one snapshot of node positions.
//!
//! Bigger clusters claim screen space first; a label whose estimated
//! footprint collides with an accepted one is dropped for this snapshot.

use crate::model::{ClusterLabels, Partition, Placement, Point, PositionSnapshot, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Drop any label that overlaps a larger cluster's label
    #[default]
    Skip,
    /// Push nearby anchors apart for a few passes, then drop what still overlaps
    Nudge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOptions {
    pub strategy: PlacementStrategy,
    /// Estimated advance per character at the base font size, in pixels.
    pub char_width: f64,
    pub line_height: f64,
    /// Horizontal padding on each side of the text.
    pub padding: f64,
    pub base_font_size: f64,
    /// Anchors closer than this are pushed apart by the nudge strategy.
    pub nudge_radius: f64,
    pub nudge_passes: usize,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            strategy: PlacementStrategy::Skip,
            char_width: 8.0,
            line_height: 20.0,
            padding: 4.0,
            base_font_size: 16.0,
            nudge_radius: 40.0,
            nudge_passes: 5,
        }
    }
}

/// How cluster labels look at a given zoom scale.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ZoomStyle {
    pub visible: bool,
    pub font_size: f64,
    pub opacity: f64,
    pub font_weight: u16,
}

impl ZoomStyle {
    pub fn for_scale(scale: f64) -> Self {
        let visible = scale.is_finite() && scale >= 0.2;
        let font_size = if scale > 0.0 {
            (16.0 / scale).clamp(12.0, 20.0)
        } else {
            20.0
        };
        let opacity = if scale < 0.5 {
            (scale * 2.0).max(0.0)
        } else {
            1.0
        };
        let font_weight = if scale < 0.7 { 700 } else { 900 };

        Self {
            visible,
            font_size,
            opacity,
            font_weight,
        }
    }
}

/// A labelled cluster competing for screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    pub cluster_id: String,
    pub text: String,
    pub size: usize,
    pub center: Point,
}

/// Build one candidate per labelled cluster, anchored at the mean position
/// of its members. Clusters with no positioned member are left out.
pub fn candidates(
    partition: &Partition,
    labels: &ClusterLabels,
    positions: &PositionSnapshot,
) -> Vec<LabelCandidate> {
    partition
        .iter()
        .filter_map(|cluster| {
            let text = labels.label(&cluster.id)?;
            let points: Vec<&Point> = cluster
                .members
                .iter()
                .filter_map(|m| positions.get(m))
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .collect();
            if points.is_empty() {
                return None;
            }

            let n = points.len() as f64;
            let center = Point::new(
                points.iter().map(|p| p.x).sum::<f64>() / n,
                points.iter().map(|p| p.y).sum::<f64>() / n,
            );

            Some(LabelCandidate {
                cluster_id: cluster.id.clone(),
                text: text.to_string(),
                size: cluster.size(),
                center,
            })
        })
        .collect()
}

pub struct PlacementResolver {
    options: PlacementOptions,
}

impl PlacementResolver {
    pub fn new(options: PlacementOptions) -> Self {
        Self { options }
    }

    /// Resolve placements at zoom scale 1.
    pub fn place(&self, candidates: &[LabelCandidate]) -> Vec<Placement> {
        self.place_at_zoom(candidates, 1.0)
    }

    pub fn place_at_zoom(&self, candidates: &[LabelCandidate], scale: f64) -> Vec<Placement> {
        let style = ZoomStyle::for_scale(scale);
        if !style.visible {
            return Vec::new();
        }

        let mut anchored: Vec<LabelCandidate> = candidates.to_vec();
        if self.options.strategy == PlacementStrategy::Nudge {
            self.nudge(&mut anchored);
        }

        // Stable: equal sizes keep candidate order
        anchored.sort_by(|a, b| b.size.cmp(&a.size));

        let mut accepted: Vec<Placement> = Vec::new();
        for candidate in anchored {
            let rect = self.footprint(&candidate.text, candidate.center, &style);
            if accepted.iter().any(|p| p.rect.overlaps(&rect)) {
                continue;
            }
            accepted.push(Placement {
                cluster_id: candidate.cluster_id,
                text: candidate.text,
                x: candidate.center.x,
                y: candidate.center.y,
                font_size: style.font_size,
                rect,
            });
        }

        accepted
    }

    /// Estimated label rectangle centered on `center`.
    pub fn footprint(&self, text: &str, center: Point, style: &ZoomStyle) -> Rect {
        let scale = style.font_size / self.options.base_font_size;
        let chars = text.chars().count() as f64;
        let width = chars * self.options.char_width * scale + 2.0 * self.options.padding;
        let height = self.options.line_height * scale;
        Rect::centered(center, width, height)
    }

    fn nudge(&self, labels: &mut [LabelCandidate]) {
        let radius = self.options.nudge_radius;

        for _ in 0..self.options.nudge_passes {
            let mut moved = false;

            for i in 0..labels.len() {
                for j in (i + 1)..labels.len() {
                    let a = labels[i].center;
                    let b = labels[j].center;
                    let distance = a.distance(&b);
                    if distance >= radius {
                        continue;
                    }

                    // Coincident anchors separate horizontally
                    let (ux, uy) = if distance > 0.0 {
                        ((b.x - a.x) / distance, (b.y - a.y) / distance)
                    } else {
                        (1.0, 0.0)
                    };
                    let push = (radius - distance) * 0.5;

                    labels[i].center = Point::new(a.x - ux * push, a.y - uy * push);
                    labels[j].center = Point::new(b.x + ux * push, b.y + uy * push);
                    moved = true;
                }
            }

            if !moved {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cluster;

    fn candidate(id: &str, text: &str, size: usize, x: f64, y: f64) -> LabelCandidate {
        LabelCandidate {
            cluster_id: id.to_string(),
            text: text.to_string(),
            size,
            center: Point::new(x, y),
        }
    }

    fn resolver(strategy: PlacementStrategy) -> PlacementResolver {
        PlacementResolver::new(PlacementOptions {
            strategy,
            char_width: 10.0,
            padding: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_smaller_overlapping_label_is_dropped() {
        // 8 chars * 10px = 80px wide, so half-widths sum to 80 while the
        // centers are only 50px apart.
        let placed = resolver(PlacementStrategy::Skip).place(&[
            candidate("small", "Pensions", 3, 50.0, 0.0),
            candidate("big", "Mortgage", 9, 0.0, 0.0),
        ]);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].cluster_id, "big");
        assert_eq!(placed[0].text, "Mortgage");
        assert_eq!((placed[0].x, placed[0].y), (0.0, 0.0));
    }

    #[test]
    fn test_distant_labels_are_all_placed() {
        let placed = resolver(PlacementStrategy::Skip).place(&[
            candidate("a", "Loans", 4, 0.0, 0.0),
            candidate("b", "Savings", 4, 0.0, 100.0),
            candidate("c", "Housing", 4, 300.0, 0.0),
        ]);
        let ids: Vec<_> = placed.iter().map(|p| p.cluster_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_placements_never_overlap() {
        let mut crowd = Vec::new();
        for i in 0..40 {
            let x = (i % 8) as f64 * 25.0;
            let y = (i / 8) as f64 * 12.0;
            crowd.push(candidate(&format!("c{}", i), "Investment", i % 5 + 3, x, y));
        }

        for strategy in [PlacementStrategy::Skip, PlacementStrategy::Nudge] {
            let placed = resolver(strategy).place(&crowd);
            assert!(!placed.is_empty());
            for i in 0..placed.len() {
                for j in (i + 1)..placed.len() {
                    assert!(
                        !placed[i].rect.overlaps(&placed[j].rect),
                        "{} overlaps {}",
                        placed[i].cluster_id,
                        placed[j].cluster_id
                    );
                }
            }
        }
    }

    #[test]
    fn test_place_is_idempotent() {
        let crowd = vec![
            candidate("a", "Loans", 5, 0.0, 0.0),
            candidate("b", "Savings", 5, 20.0, 5.0),
            candidate("c", "Housing", 2, 200.0, 0.0),
        ];
        let r = resolver(PlacementStrategy::Nudge);
        assert_eq!(r.place(&crowd), r.place(&crowd));
    }

    #[test]
    fn test_nudge_separates_close_anchors() {
        let placed = resolver(PlacementStrategy::Nudge).place(&[
            candidate("a", "A", 5, 0.0, 0.0),
            candidate("b", "B", 3, 30.0, 0.0),
        ]);

        assert_eq!(placed.len(), 2);
        assert!((placed[0].x - -5.0).abs() < 1e-9);
        assert!((placed[1].x - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_when_zoomed_far_out() {
        let r = resolver(PlacementStrategy::Skip);
        let crowd = vec![candidate("a", "Loans", 5, 0.0, 0.0)];
        assert!(r.place_at_zoom(&crowd, 0.1).is_empty());
        assert_eq!(r.place_at_zoom(&crowd, 0.5).len(), 1);
    }

    #[test]
    fn test_zoom_style() {
        let far = ZoomStyle::for_scale(0.4);
        assert!(far.visible);
        assert_eq!(far.font_size, 20.0);
        assert!((far.opacity - 0.8).abs() < 1e-9);
        assert_eq!(far.font_weight, 700);

        let near = ZoomStyle::for_scale(2.0);
        assert_eq!(near.font_size, 12.0);
        assert_eq!(near.opacity, 1.0);
        assert_eq!(near.font_weight, 900);

        assert!(!ZoomStyle::for_scale(0.1).visible);
    }

    #[test]
    fn test_candidates_use_member_centroid() {
        let partition = Partition::new(vec![
            Cluster {
                id: "cluster-0".to_string(),
                members: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            },
            Cluster {
                id: "cluster-1".to_string(),
                members: vec!["d".to_string()],
            },
        ]);
        let mut labels = ClusterLabels::new();
        labels.insert("cluster-0", "Loans");
        labels.insert("cluster-1", "Ignored");

        let mut positions = PositionSnapshot::new();
        positions.insert("a".to_string(), Point::new(0.0, 0.0));
        positions.insert("b".to_string(), Point::new(10.0, 20.0));
        // "c" and "d" have not been laid out yet

        let found = candidates(&partition, &labels, &positions);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].center, Point::new(5.0, 10.0));
        assert_eq!(found[0].size, 3);
    }
}
