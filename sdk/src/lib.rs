//! Entry points for rendering channel-graph snapshots outside a dashboard.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use graph::network::{DescribedGraph, NetworkGraph};
use graph::{PanelSeries, RenderContext};
use lnviz_core::error::{ErrorCode, LnvizError};
use query::{ChartSpec, PanelRenderer, RenderError, RenderRequest};

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("unrecognized snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl LnvizError for SdkError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SdkError::Parse(_) => ErrorCode::InvalidArgument,
            SdkError::Render(err) => err.error_code(),
        }
    }
}

/// Any of the accepted input documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Positional data frames, as a panel receives them.
    Panel(PanelSeries),
    /// Flattened node/edge document from the graph exporter.
    Network(NetworkGraph),
    /// Raw `describegraph` output of a Lightning daemon.
    Described(DescribedGraph),
}

impl Snapshot {
    pub fn parse_json(raw: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `identity` marks the home node of a raw daemon snapshot; the other
    /// formats carry their own home flag.
    pub fn into_series(self, identity: Option<&str>) -> PanelSeries {
        match self {
            Snapshot::Panel(series) => {
                debug!("Snapshot holds panel frames");
                series
            }
            Snapshot::Network(graph) => {
                debug!("Snapshot holds an exporter document");
                graph.to_series()
            }
            Snapshot::Described(graph) => {
                debug!(
                    "Snapshot holds describegraph output ({} nodes, {} edges)",
                    graph.nodes.len(),
                    graph.edges.len()
                );
                NetworkGraph::from_described(&graph, identity.unwrap_or_default()).to_series()
            }
        }
    }
}

pub fn render_snapshot(
    renderer: &PanelRenderer,
    raw: &str,
    identity: Option<&str>,
    ctx: &RenderContext,
    request: RenderRequest,
) -> Result<ChartSpec, SdkError> {
    let series = Snapshot::parse_json(raw)?.into_series(identity);
    Ok(renderer.render_with(&series, ctx, request)?)
}
