use crate::analysis::{ClusterOptions, ClusterStrategy};
use crate::model::ClusterReport;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

pub struct JsonOutput {
    pub dataset: String,
    pub options: ClusterOptions,
}

impl JsonOutput {
    pub fn new(dataset: impl Into<String>, options: ClusterOptions) -> Self {
        Self {
            dataset: dataset.into(),
            options,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    dataset: &'a str,
    strategy: ClusterStrategy,
    threshold: f64,
    max_size: usize,
    total_nodes: usize,
    total_edges: usize,
    components: usize,
    singletons: usize,
    clusters: Vec<JsonCluster<'a>>,
}

#[derive(Serialize)]
struct JsonCluster<'a> {
    id: &'a str,
    label: Option<&'a str>,
    size: usize,
    members: &'a [String],
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, report: &ClusterReport, writer: &mut W) -> std::io::Result<()> {
        let json_report = JsonReport {
            dataset: &self.dataset,
            strategy: self.options.strategy,
            threshold: self.options.threshold,
            max_size: self.options.max_size,
            total_nodes: report.total_nodes,
            total_edges: report.total_edges,
            components: report.components,
            singletons: report.partition.singleton_count(),
            clusters: report
                .partition
                .iter()
                .map(|c| JsonCluster {
                    id: &c.id,
                    label: report.labels.label(&c.id),
                    size: c.size(),
                    members: &c.members,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&json_report).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}
