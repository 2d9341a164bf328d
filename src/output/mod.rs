mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::ClusterReport;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, report: &ClusterReport, writer: &mut W) -> std::io::Result<()>;
}

/// Label text for display, falling back to the cluster id.
pub(crate) fn display_label<'a>(report: &'a ClusterReport, cluster_id: &'a str) -> &'a str {
    report.labels.label(cluster_id).unwrap_or(cluster_id)
}
