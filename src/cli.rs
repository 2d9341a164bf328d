use crate::analysis::ClusterStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "topicmap")]
#[command(about = "Cluster, label and visualize survey-topic similarity graphs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to .topicmap.toml in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cluster a similarity graph and print a report
    Cluster(ClusterArgs),

    /// Launch interactive graph visualization
    Graph(GraphArgs),

    /// Generate a starter .topicmap.toml configuration file
    Init(InitArgs),
}

/// Inputs and clustering overrides shared by `cluster` and `graph`.
#[derive(Parser, Debug, Clone)]
pub struct DatasetArgs {
    /// Similarity graph JSON ({"nodes": [...], "links": [...]})
    pub graph: PathBuf,

    /// Survey response JSON keyed by node id
    #[arg(long)]
    pub survey: Option<PathBuf>,

    /// Clustering strategy (overrides config)
    #[arg(long)]
    pub strategy: Option<ClusterStrategy>,

    /// Minimum similarity for a merge, 0.0-1.0 (overrides config)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum topics per cluster (overrides config)
    #[arg(long)]
    pub max_size: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Members listed per cluster in markdown output
    #[arg(long, default_value = "10")]
    pub max_members: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Start HTTP server for interactive visualization
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Export graph as static HTML file instead of serving
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .topicmap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
