//! Graph Lab
//!
//! An interactive graph workbench with:
//! - An in-memory graph store (user-assigned node ids, parallel edges, self-loops)
//! - Structural analysis: connected components, bridges, bipartiteness, degrees
//! - Weighted shortest paths (directed or undirected)
//! - Adjacency matrix spectrum via a Jacobi eigen-solver
//! - A line-oriented shell for interactive use and scripts

pub mod graph;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use graph::{GraphMode, SpectrumConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "graph-lab.yaml";

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub engine: EngineYamlConfig,
    pub spectrum: SpectrumConfig,
    pub output: OutputYamlConfig,
}

/// Initial engine mode
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineYamlConfig {
    pub directed: bool,
    pub physics_enabled: bool,
}

impl Default for EngineYamlConfig {
    fn default() -> Self {
        let mode = GraphMode::default();
        Self {
            directed: mode.directed,
            physics_enabled: mode.physics_enabled,
        }
    }
}

/// Output section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputYamlConfig {
    pub format: OutputFormat,
}

/// How command outcomes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON document per outcome
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mode a new engine starts in
    pub mode: GraphMode,
    pub spectrum: SpectrumConfig,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_sources(YamlConfig::default(), |_| None)
    }
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries [`DEFAULT_CONFIG_FILE`] in CWD. A missing
    /// or malformed file falls back to env vars / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);
        Ok(Self::from_sources(yaml, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed YAML config with variables from `env`.
    ///
    /// Unparseable variables are ignored.
    pub fn from_sources(yaml: YamlConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            mode: GraphMode {
                directed: env("GRAPH_LAB_DIRECTED")
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(yaml.engine.directed),
                physics_enabled: yaml.engine.physics_enabled,
            },
            spectrum: SpectrumConfig {
                tolerance: env("GRAPH_LAB_EIGEN_TOLERANCE")
                    .and_then(|s| s.parse().ok())
                    .filter(|t: &f64| t.is_finite() && *t > 0.0)
                    .unwrap_or(yaml.spectrum.tolerance),
                max_sweeps: yaml.spectrum.max_sweeps,
            },
            output: env("GRAPH_LAB_OUTPUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.output.format),
        }
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
