use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::debug;

/// What happens to the neighbors of a node reached with no remaining depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerminalNeighbors {
    /// Neighbors of a depth-exhausted node are not listed; only the edges
    /// leading to them are.
    #[default]
    Omit,
    /// Direct neighbors are always listed, so every edge has both endpoints.
    Include,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TraversalConfig {
    pub depth: u8,
    pub min_degree: u32,
    pub max_degree: u32,
    pub terminal_neighbors: TerminalNeighbors,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            min_degree: 2,
            max_degree: 30,
            terminal_neighbors: TerminalNeighbors::Omit,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub zoom: f64,
    pub repulsion: f64,
    pub gravity: f64,
    pub friction: f64,
    pub edge_length: f64,
    pub curveness: f64,
    pub edge_symbol_size: f64,
    pub emphasis_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zoom: 0.3,
            repulsion: 10_000.0,
            gravity: 0.1,
            friction: 0.3,
            edge_length: 30.0,
            curveness: 0.3,
            edge_symbol_size: 6.0,
            emphasis_width: 6.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub node_fill: String,
    pub node_border_width: f64,
    pub title_background: String,
    pub title_font_size: u32,
    pub tooltip_text_color: String,
    pub tooltip_background: String,
    pub select_color: String,
    pub group_separator: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_fill: "#fff".into(),
            node_border_width: 3.0,
            title_background: "#444c".into(),
            title_font_size: 12,
            tooltip_text_color: "#fff".into(),
            tooltip_background: "#44444444".into(),
            select_color: "#fff".into(),
            group_separator: ",".into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub traversal: TraversalConfig,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
}

impl PanelConfig {
    /// Layer `config/default`, `config/{RUN_MODE}` and `LNVIZ_*` variables
    /// (e.g. `LNVIZ_TRAVERSAL__DEPTH=3`) over the built-in defaults.
    /// Missing files are skipped.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&run_mode).to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("LNVIZ")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            "Loaded panel config from {} (run mode {}): depth {}, degree {}..={}",
            dir.display(),
            run_mode,
            config.traversal.depth,
            config.traversal.min_degree,
            config.traversal.max_degree
        );
        Ok(config)
    }
}
