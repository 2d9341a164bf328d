pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod graph;
pub mod input;
pub mod logging;
pub mod model;
pub mod output;
pub mod style;
pub mod view;

pub use api::{Analysis, AnalysisOptions, TopicmapError, analyze, analyze_json};
pub use cli::Cli;
pub use commands::{cmd_cluster, cmd_graph, cmd_init};
pub use config::Config;
pub use input::{Dataset, load_dataset};
pub use model::{ClusterReport, Placement, PositionSnapshot};
pub use view::ViewState;
