//! lnviz - render a Lightning channel-graph snapshot as a force-layout chart config.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use graph::network::{DescribedGraph, NetworkGraph};
use graph::RenderContext;
use lnviz_core::config::{PanelConfig, TerminalNeighbors};
use lnviz_sdk::render_snapshot;
use query::PanelRenderer;

#[derive(Parser)]
#[command(name = "lnviz")]
#[command(author, version)]
#[command(about = "Render the neighborhood of your Lightning node as a graph chart config")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding default.toml / {RUN_MODE}.toml
    #[arg(long, global = true, default_value = "config", env = "LNVIZ_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a snapshot (panel frames, exporter document or describegraph output)
    Render {
        /// Snapshot file
        input: PathBuf,

        /// Public key of the home node, for describegraph input
        #[arg(long)]
        identity: Option<String>,

        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 720.0)]
        height: f64,

        /// Hop depth (overrides config)
        #[arg(long)]
        depth: Option<u8>,

        /// Smallest channel count a neighbor needs to be expanded
        #[arg(long)]
        min_degree: Option<u32>,

        /// Largest channel count a neighbor may have to be expanded
        #[arg(long)]
        max_degree: Option<u32>,

        /// List direct neighbors of nodes at the hop limit
        #[arg(long)]
        include_terminal: bool,
    },
    /// Flatten describegraph output into the exporter's node/edge document
    Flatten {
        input: PathBuf,

        #[arg(long)]
        identity: String,
    },
    /// Print the field layout of the exporter document
    Fields,
}

fn main() -> Result<()> {
    lnviz_core::init_tracing();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Render {
            input,
            identity,
            width,
            height,
            depth,
            min_degree,
            max_degree,
            include_terminal,
        } => {
            let config = PanelConfig::load_from(&cli.config_dir)
                .with_context(|| format!("loading config from {}", cli.config_dir.display()))?;
            let renderer = PanelRenderer::new(config);

            let mut request = renderer.default_request();
            if let Some(depth) = depth {
                request.depth = depth;
            }
            if let Some(min_degree) = min_degree {
                request.min_degree = min_degree;
            }
            if let Some(max_degree) = max_degree {
                request.max_degree = max_degree;
            }
            if include_terminal {
                request.terminal_neighbors = TerminalNeighbors::Include;
            }

            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let spec = render_snapshot(
                &renderer,
                &raw,
                identity.as_deref(),
                &RenderContext::new(width, height),
                request,
            )
            .with_context(|| format!("rendering {}", input.display()))?;
            to_json(&spec, cli.pretty)?
        }
        Commands::Flatten { input, identity } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let described: DescribedGraph =
                serde_json::from_str(&raw).context("parsing describegraph output")?;
            to_json(&NetworkGraph::from_described(&described, &identity), cli.pretty)?
        }
        Commands::Fields => to_json(&NetworkGraph::field_schema(), cli.pretty)?,
    };

    println!("{output}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
