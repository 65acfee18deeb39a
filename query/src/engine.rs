use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chart::{ChartAssembler, ChartSpec};
use crate::dsl::{RenderRequest, RequestValidationError};
use crate::neighborhood::NeighborhoodExtractor;
use graph::{EdgeTable, GraphBuilder, GraphError, NodeTable, PanelSeries, RenderContext, TableError};
use lnviz_core::config::PanelConfig;
use lnviz_core::error::{ErrorCode, LnvizError};
use lnviz_core::metrics::{MetricsCollector, MetricsSnapshot};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    #[error("invalid panel data: {0}")]
    Table(#[from] TableError),
    #[error("no node is flagged as home; cannot pick a traversal origin")]
    MissingHomeNode,
}

impl From<GraphError> for RenderError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::MissingHomeNode => RenderError::MissingHomeNode,
        }
    }
}

impl LnvizError for RenderError {
    fn error_code(&self) -> ErrorCode {
        match self {
            RenderError::InvalidRequest(_) => ErrorCode::InvalidArgument,
            RenderError::Table(err) => err.error_code(),
            RenderError::MissingHomeNode => ErrorCode::NotFound,
        }
    }
}

/// Builds the channel graph, extracts the home neighborhood and assembles the chart.
///
/// Each call is independent; only the metrics collector outlives a render.
pub struct PanelRenderer {
    config: PanelConfig,
    builder: GraphBuilder,
    assembler: ChartAssembler,
    metrics: MetricsCollector,
}

impl PanelRenderer {
    pub fn new(config: PanelConfig) -> Self {
        let builder =
            GraphBuilder::new().with_group_separator(config.style.group_separator.clone());
        let assembler = ChartAssembler::new(&config);
        Self {
            config,
            builder,
            assembler,
            metrics: MetricsCollector::default(),
        }
    }

    /// Request built from the configured traversal defaults.
    pub fn default_request(&self) -> RenderRequest {
        RenderRequest::from(&self.config.traversal)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn render(
        &self,
        series: &PanelSeries,
        ctx: &RenderContext,
    ) -> Result<ChartSpec, RenderError> {
        self.render_with(series, ctx, self.default_request())
    }

    pub fn render_with(
        &self,
        series: &PanelSeries,
        ctx: &RenderContext,
        request: RenderRequest,
    ) -> Result<ChartSpec, RenderError> {
        let (nodes, edges) = series.decode().map_err(|err| {
            self.metrics.record_failure();
            warn!("Rejecting panel data: {}", err);
            RenderError::from(err)
        })?;
        self.render_tables_with(&nodes, &edges, ctx, request)
    }

    pub fn render_tables(
        &self,
        nodes: &NodeTable,
        edges: &EdgeTable,
        ctx: &RenderContext,
    ) -> Result<ChartSpec, RenderError> {
        self.render_tables_with(nodes, edges, ctx, self.default_request())
    }

    pub fn render_tables_with(
        &self,
        nodes: &NodeTable,
        edges: &EdgeTable,
        ctx: &RenderContext,
        request: RenderRequest,
    ) -> Result<ChartSpec, RenderError> {
        let started = Instant::now();
        let result = self.render_internal(nodes, edges, ctx, request);
        match &result {
            Ok((_, skipped)) => {
                self.metrics
                    .record_render(started.elapsed().as_micros() as u64, *skipped);
            }
            Err(err) => {
                self.metrics.record_failure();
                warn!("Render failed ({}): {}", err.error_code(), err);
            }
        }
        result.map(|(spec, _)| spec)
    }

    fn render_internal(
        &self,
        nodes: &NodeTable,
        edges: &EdgeTable,
        ctx: &RenderContext,
        request: RenderRequest,
    ) -> Result<(ChartSpec, usize), RenderError> {
        request.validate()?;

        let graph = self.builder.build(nodes, edges, ctx);
        let home = graph.home_index()?;
        debug!("Home node {} at row {}", graph.nodes[home].id, home);

        let subgraph = NeighborhoodExtractor::new(&graph, request).extract(home);
        info!(
            "Rendered {} nodes, {} channels within {} hops ({} nodes, {} channels total)",
            subgraph.nodes.len().saturating_sub(1),
            subgraph.edges.len(),
            request.depth,
            graph.nodes.len(),
            graph.edges.len()
        );

        let spec = self.assembler.assemble(&graph, &subgraph, request.depth);
        Ok((spec, graph.stats.skipped_edges))
    }
}

impl Default for PanelRenderer {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}
