use crate::cli::{ClusterArgs, OutputFormat};
use crate::fs::{FileSystem, default_fs};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::io::{self, Write};
use std::path::Path;

use super::CommandContext;

pub fn cmd_cluster(args: ClusterArgs, config_path: Option<&Path>) -> i32 {
    cmd_cluster_with_fs(args, config_path, default_fs())
}

pub fn cmd_cluster_with_fs(
    args: ClusterArgs,
    config_path: Option<&Path>,
    fs: &dyn FileSystem,
) -> i32 {
    let ctx = match CommandContext::new(&args.dataset, config_path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let mut output: Box<dyn Write> = match &args.output {
        Some(output_path) => match fs.create_file(output_path) {
            Ok(writer) => writer,
            Err(e) => {
                style::error(&format!("Could not create output file: {}", e));
                return 1;
            }
        },
        None => Box::new(io::stdout()),
    };

    // Format to a buffer first so markdown can be rendered for the terminal
    let mut buffer = Vec::new();
    let format_result = match args.format {
        OutputFormat::Markdown => {
            MarkdownOutput::new(&ctx.name, args.max_members).format(&ctx.report, &mut buffer)
        }
        OutputFormat::Json => JsonOutput::new(&ctx.name, ctx.config.clustering.clone())
            .format(&ctx.report, &mut buffer),
    };

    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }

    let output_str = String::from_utf8_lossy(&buffer);

    let write_result = if args.output.is_none() && args.format == OutputFormat::Markdown {
        style::render_markdown(&output_str, &mut output)
    } else {
        write!(output, "{}", output_str).and_then(|_| output.flush())
    };

    if let Err(e) = write_result {
        style::error(&format!("Failed to write output: {}", e));
        return 1;
    }

    if let Some(path) = &args.output {
        style::success(&format!("Cluster report written to {}", style::path(path)));
        style::section("Summary");
        println!("{}", style::metric("Clusters", ctx.report.partition.len()));
        println!("{}", style::metric("Labelled", ctx.report.labels.len()));
        println!(
            "{}",
            style::metric("Unclustered", ctx.report.partition.singleton_count())
        );
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DatasetArgs;
    use crate::fs::mock::MockFs;
    use std::path::PathBuf;

    const GRAPH: &str = r#"{
        "nodes": [
            {"id": "home loan eligibility"},
            {"id": "loan interest rate"},
            {"id": "car loan emi calculator"},
            {"id": "favourite holiday"}
        ],
        "links": [
            {"source": "home loan eligibility", "target": "loan interest rate", "strength": 0.9},
            {"source": "loan interest rate", "target": "car loan emi calculator", "strength": 0.85},
            {"source": "car loan emi calculator", "target": "favourite holiday", "strength": 0.1}
        ]
    }"#;

    fn args(format: OutputFormat) -> ClusterArgs {
        ClusterArgs {
            dataset: DatasetArgs {
                graph: PathBuf::from("/data/loans.json"),
                survey: None,
                strategy: None,
                threshold: None,
                max_size: None,
            },
            format,
            output: Some(PathBuf::from("/out/report")),
            max_members: 10,
        }
    }

    #[test]
    fn test_writes_markdown_report() {
        let fs = MockFs::with_files([("/data/loans.json", GRAPH)]);
        assert_eq!(cmd_cluster_with_fs(args(OutputFormat::Markdown), None, &fs), 0);

        let report = fs.get(Path::new("/out/report")).unwrap();
        assert!(report.contains("# Topic Clusters: loans"));
        assert!(report.contains("### Loan (3 topics)"));
    }

    #[test]
    fn test_writes_json_report() {
        let fs = MockFs::with_files([("/data/loans.json", GRAPH)]);
        assert_eq!(cmd_cluster_with_fs(args(OutputFormat::Json), None, &fs), 0);

        let report = fs.get(Path::new("/out/report")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["clusters"][0]["label"], "Loan");
        assert_eq!(value["clusters"][1]["members"][0], "favourite holiday");
    }

    #[test]
    fn test_missing_graph_fails() {
        let fs = MockFs::new();
        assert_eq!(cmd_cluster_with_fs(args(OutputFormat::Json), None, &fs), 1);
    }
}
