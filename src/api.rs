//! Library API for topicmap.
//!
//! Unlike the CLI commands, which print messages and return exit codes, these
//! functions return `Result`s for the caller to handle.
//!
//! # Example
//!
//! ```no_run
//! use topicmap::{AnalysisOptions, analyze};
//! use std::path::Path;
//!
//! let analysis = analyze(Path::new("graph.json"), AnalysisOptions::default())?;
//! for cluster in analysis.report.partition.iter() {
//!     let label = analysis.report.labels.label(&cluster.id).unwrap_or("-");
//!     println!("{} ({} topics)", label, cluster.size());
//! }
//! # Ok::<(), topicmap::TopicmapError>(())
//! ```

use crate::analysis::{self, ClusterError, GraphError};
use crate::config::{Config, ConfigError};
use crate::fs::default_fs;
use crate::input::{Dataset, InputError, load_dataset};
use crate::model::{ClusterReport, Placement, PositionSnapshot};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::view::ViewState;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicmapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Clustering error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for the `analyze` function.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Survey response document keyed by node id.
    pub survey: Option<PathBuf>,

    /// Clustering, labeling and placement settings.
    pub config: Config,
}

impl AnalysisOptions {
    /// Use the `.topicmap.toml` found in `dir`, or defaults.
    pub fn from_dir(dir: &Path) -> Result<Self, TopicmapError> {
        Ok(Self {
            survey: None,
            config: Config::load(dir)?,
        })
    }
}

/// A clustered dataset, ready for label placement and view queries.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: Dataset,
    pub report: ClusterReport,
    pub config: Config,
}

impl Analysis {
    pub fn new(dataset: Dataset, config: Config) -> Result<Self, TopicmapError> {
        config.validate()?;
        let report = analysis::analyze(&dataset.graph, &dataset.precomputed, &config)?;
        Ok(Self {
            dataset,
            report,
            config,
        })
    }

    /// Non-overlapping cluster labels for one snapshot of node positions.
    pub fn place(&self, positions: &PositionSnapshot, zoom: f64) -> Vec<Placement> {
        analysis::place_labels(&self.report, positions, zoom, &self.config.placement)
    }

    pub fn search(&self, term: &str) -> ViewState {
        ViewState::search(&self.dataset.graph, &self.dataset.details, term)
    }

    pub fn select(&self, id: &str) -> ViewState {
        ViewState::select(&self.dataset.graph, id)
    }

    pub fn to_markdown(&self, name: &str, max_members: usize) -> Result<String, TopicmapError> {
        let mut buffer = Vec::new();
        MarkdownOutput::new(name, max_members).format(&self.report, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }

    pub fn to_json(&self, name: &str) -> Result<String, TopicmapError> {
        let mut buffer = Vec::new();
        JsonOutput::new(name, self.config.clustering.clone()).format(&self.report, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

/// Load a graph (and optional survey) from disk and cluster it.
pub fn analyze(graph_path: &Path, options: AnalysisOptions) -> Result<Analysis, TopicmapError> {
    let dataset = load_dataset(default_fs(), graph_path, options.survey.as_deref())?;
    Analysis::new(dataset, options.config)
}

/// Same as `analyze`, for documents already in memory.
pub fn analyze_json(
    graph_json: &str,
    survey_json: Option<&str>,
    config: Config,
) -> Result<Analysis, TopicmapError> {
    let dataset = Dataset::from_json(graph_json, survey_json)?;
    Analysis::new(dataset, config)
}
