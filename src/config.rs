use crate::analysis::{
    ClusterOptions, ClusterStrategy, Domain, LabelOptions, PlacementOptions, PlacementStrategy,
};
use crate::fs::{FileSystem, default_fs};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".topicmap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid {key} = {value}: must be {constraint}")]
    Invalid {
        key: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub clustering: ClusterOptions,
    pub labels: LabelOptions,
    pub placement: PlacementOptions,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    clustering: Option<RawClustering>,
    labels: Option<RawLabels>,
    placement: Option<RawPlacement>,
}

#[derive(Debug, Deserialize)]
struct RawClustering {
    strategy: Option<ClusterStrategy>,
    threshold: Option<f64>,
    max_size: Option<usize>,
    coherence: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawLabels {
    min_cluster_size: Option<usize>,
    max_words: Option<usize>,
    max_label_chars: Option<usize>,
    domain_weight: Option<f64>,
    stop_words: Option<Vec<String>>,
    // Ordered so ties between domains resolve the same way on every run
    domains: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct RawPlacement {
    strategy: Option<PlacementStrategy>,
    char_width: Option<f64>,
    line_height: Option<f64>,
    padding: Option<f64>,
    base_font_size: Option<f64>,
    nudge_radius: Option<f64>,
    nudge_passes: Option<usize>,
}

impl Config {
    /// Load `.topicmap.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(&dir.join(CONFIG_FILE), default_fs())
    }

    pub fn load_with_fs(config_path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        if !fs.exists(config_path) {
            return Ok(Self::default());
        }
        let content = fs.read_to_string(config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let clustering = match raw.clustering {
            Some(c) => {
                let d = ClusterOptions::default();
                ClusterOptions {
                    strategy: c.strategy.unwrap_or(d.strategy),
                    threshold: c.threshold.unwrap_or(d.threshold),
                    max_size: c.max_size.unwrap_or(d.max_size),
                    coherence: c.coherence.unwrap_or(d.coherence),
                }
            }
            None => ClusterOptions::default(),
        };

        let labels = match raw.labels {
            Some(l) => {
                let d = LabelOptions::default();
                let mut stop_words = d.stop_words;
                stop_words.extend(
                    l.stop_words
                        .unwrap_or_default()
                        .into_iter()
                        .map(|w| w.to_lowercase()),
                );
                let domains = match l.domains {
                    Some(map) => map
                        .into_iter()
                        .map(|(key, words)| {
                            Domain::new(capitalize(&key), words.into_iter().map(|w| w.to_lowercase()))
                        })
                        .collect(),
                    None => d.domains,
                };
                LabelOptions {
                    min_cluster_size: l.min_cluster_size.unwrap_or(d.min_cluster_size),
                    max_words: l.max_words.unwrap_or(d.max_words),
                    max_label_chars: l.max_label_chars.unwrap_or(d.max_label_chars),
                    domain_weight: l.domain_weight.unwrap_or(d.domain_weight),
                    stop_words,
                    domains,
                }
            }
            None => LabelOptions::default(),
        };

        let placement = match raw.placement {
            Some(p) => {
                let d = PlacementOptions::default();
                PlacementOptions {
                    strategy: p.strategy.unwrap_or(d.strategy),
                    char_width: p.char_width.unwrap_or(d.char_width),
                    line_height: p.line_height.unwrap_or(d.line_height),
                    padding: p.padding.unwrap_or(d.padding),
                    base_font_size: p.base_font_size.unwrap_or(d.base_font_size),
                    nudge_radius: p.nudge_radius.unwrap_or(d.nudge_radius),
                    nudge_passes: p.nudge_passes.unwrap_or(d.nudge_passes),
                }
            }
            None => PlacementOptions::default(),
        };

        let config = Self {
            clustering,
            labels,
            placement,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes and weights the label geometry cannot work with.
    /// Clustering options are checked by the cluster builder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        let positive = [
            ("labels.domain_weight", self.labels.domain_weight),
            ("placement.char_width", p.char_width),
            ("placement.line_height", p.line_height),
            ("placement.base_font_size", p.base_font_size),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    value,
                    constraint: "a positive number",
                });
            }
        }

        let non_negative = [
            ("placement.padding", p.padding),
            ("placement.nudge_radius", p.nudge_radius),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    value,
                    constraint: "zero or more",
                });
            }
        }

        Ok(())
    }
}

/// Starter `.topicmap.toml` written by `topicmap init`.
pub fn generate_config_template() -> String {
    let d = Config::default();
    format!(
        r#"# topicmap configuration

[clustering]
# merge | sweep | precomputed
strategy = "merge"
# Minimum similarity for two clusters to join
threshold = {threshold}
max_size = {max_size}
# Require several strong links between larger clusters before merging
coherence = {coherence}

[labels]
min_cluster_size = {min_cluster_size}
max_words = {max_words}
max_label_chars = {max_label_chars}
domain_weight = {domain_weight:.1}
# Added to the built-in stop words
stop_words = []

# Replaces the built-in domain dictionaries when present
# [labels.domains]
# pensions = ["pension", "retirement", "annuity"]

[placement]
# skip | nudge
strategy = "skip"
char_width = {char_width:.1}
line_height = {line_height:.1}
padding = {padding:.1}
# Font size the character width and line height were measured at
base_font_size = {base_font_size:.1}
# nudge only: anchors closer than this are pushed apart
nudge_radius = {nudge_radius:.1}
nudge_passes = {nudge_passes}
"#,
        threshold = d.clustering.threshold,
        max_size = d.clustering.max_size,
        coherence = d.clustering.coherence,
        min_cluster_size = d.labels.min_cluster_size,
        max_words = d.labels.max_words,
        max_label_chars = d.labels.max_label_chars,
        domain_weight = d.labels.domain_weight,
        char_width = d.placement.char_width,
        line_height = d.placement.line_height,
        padding = d.placement.padding,
        base_font_size = d.placement.base_font_size,
        nudge_radius = d.placement.nudge_radius,
        nudge_passes = d.placement.nudge_passes,
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}
