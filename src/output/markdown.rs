use crate::model::ClusterReport;
use crate::output::{OutputFormatter, display_label};
use std::io::Write;

pub struct MarkdownOutput {
    pub dataset: String,
    /// Members listed per cluster before the rest are summarized.
    pub max_members: usize,
}

impl MarkdownOutput {
    pub fn new(dataset: impl Into<String>, max_members: usize) -> Self {
        Self {
            dataset: dataset.into(),
            max_members,
        }
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, report: &ClusterReport, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Topic Clusters: {}\n", self.dataset)?;

        writeln!(writer, "## Summary\n")?;
        writeln!(writer, "- **Topics**: {}", report.total_nodes)?;
        writeln!(writer, "- **Links**: {}", report.total_edges)?;
        writeln!(writer, "- **Connected components**: {}", report.components)?;
        writeln!(writer, "- **Clusters**: {}", report.partition.len())?;
        writeln!(
            writer,
            "- **Unclustered topics**: {}\n",
            report.partition.singleton_count()
        )?;

        let grouped: Vec<_> = report
            .partition
            .iter()
            .filter(|c| !c.is_singleton())
            .collect();

        if grouped.is_empty() {
            writeln!(writer, "## No Clusters Found\n")?;
            writeln!(
                writer,
                "No two topics are similar enough to group. Try a lower threshold."
            )?;
            return Ok(());
        }

        writeln!(writer, "## Clusters\n")?;
        for cluster in grouped {
            writeln!(
                writer,
                "### {} ({} topics)\n",
                display_label(report, &cluster.id),
                cluster.size()
            )?;
            for member in cluster.members.iter().take(self.max_members) {
                writeln!(writer, "- {}", member)?;
            }
            let hidden = cluster.size().saturating_sub(self.max_members);
            if hidden > 0 {
                writeln!(writer, "- _…and {} more_", hidden)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cluster, ClusterLabels, Partition};

    fn report(clusters: Vec<Cluster>, labels: ClusterLabels) -> ClusterReport {
        let total_nodes = clusters.iter().map(|c| c.size()).sum();
        ClusterReport {
            partition: Partition::new(clusters),
            labels,
            total_nodes,
            total_edges: 0,
            components: 1,
        }
    }

    fn render(output: &MarkdownOutput, report: &ClusterReport) -> String {
        let mut buffer = Vec::new();
        output.format(report, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_lists_clusters_with_labels() {
        let mut labels = ClusterLabels::new();
        labels.insert("cluster-0", "Loan");
        let report = report(
            vec![
                Cluster {
                    id: "cluster-0".to_string(),
                    members: vec!["a".into(), "b".into(), "c".into()],
                },
                Cluster {
                    id: "cluster-1".to_string(),
                    members: vec!["d".into(), "e".into()],
                },
                Cluster {
                    id: "cluster-2".to_string(),
                    members: vec!["f".into()],
                },
            ],
            labels,
        );

        let text = render(&MarkdownOutput::new("survey", 2), &report);
        assert!(text.starts_with("# Topic Clusters: survey"));
        assert!(text.contains("### Loan (3 topics)"));
        assert!(text.contains("_…and 1 more_"));
        // Unlabelled clusters fall back to their id
        assert!(text.contains("### cluster-1 (2 topics)"));
        assert!(!text.contains("cluster-2"));
        assert!(text.contains("**Unclustered topics**: 1"));
    }

    #[test]
    fn test_all_singletons() {
        let report = report(
            vec![Cluster {
                id: "cluster-0".to_string(),
                members: vec!["a".into()],
            }],
            ClusterLabels::new(),
        );
        let text = render(&MarkdownOutput::new("survey", 10), &report);
        assert!(text.contains("## No Clusters Found"));
    }
}
