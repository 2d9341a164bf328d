mod cluster;
mod graph;
mod init;

pub use cluster::{cmd_cluster, cmd_cluster_with_fs};
pub use graph::cmd_graph;
pub use init::{cmd_init, cmd_init_with_fs};

use crate::analysis;
use crate::cli::DatasetArgs;
use crate::config::{CONFIG_FILE, Config, ConfigError};
use crate::fs::FileSystem;
use crate::input::{Dataset, load_dataset};
use crate::model::ClusterReport;
use crate::style;
use std::path::Path;

/// Config, loaded dataset and clustering result shared by the commands.
pub struct CommandContext {
    pub name: String,
    pub config: Config,
    pub dataset: Dataset,
    pub report: ClusterReport,
}

impl CommandContext {
    /// Load config and inputs, apply CLI overrides and cluster.
    /// Returns Err(exit_code) after reporting the problem.
    pub fn new(
        args: &DatasetArgs,
        config_path: Option<&Path>,
        fs: &dyn FileSystem,
    ) -> Result<Self, i32> {
        let mut config = load_config(config_path, fs)?;
        if let Some(strategy) = args.strategy {
            config.clustering.strategy = strategy;
        }
        if let Some(threshold) = args.threshold {
            config.clustering.threshold = threshold;
        }
        if let Some(max_size) = args.max_size {
            config.clustering.max_size = max_size;
        }

        let dataset = load_dataset(fs, &args.graph, args.survey.as_deref()).map_err(|e| {
            style::error(&e.to_string());
            1
        })?;

        let report =
            analysis::analyze(&dataset.graph, &dataset.precomputed, &config).map_err(|e| {
                style::error(&e.to_string());
                style::hint("--threshold takes a value between 0.0 and 1.0, --max-size at least 1");
                1
            })?;

        let name = args
            .graph
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "graph".to_string());

        Ok(Self {
            name,
            config,
            dataset,
            report,
        })
    }
}

fn load_config(config_path: Option<&Path>, fs: &dyn FileSystem) -> Result<Config, i32> {
    match config_path {
        // An explicit config must load
        Some(path) => fs
            .read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| Config::parse(&content))
            .map_err(|e| {
                style::error(&format!("{} ({})", e, style::path(path)));
                1
            }),
        None => Ok(
            Config::load_with_fs(Path::new(CONFIG_FILE), fs).unwrap_or_else(|e| {
                style::warning(&format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }),
        ),
    }
}
