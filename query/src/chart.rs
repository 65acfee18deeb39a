//! Force-layout chart configuration handed to the rendering engine.

use serde::{Serialize, Serializer};

use graph::Graph;
use lnviz_core::config::{LayoutConfig, PanelConfig, StyleConfig};
use lnviz_core::format::display_number;
use lnviz_core::model::{Edge, Node};

use crate::neighborhood::Subgraph;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: Title,
    pub tooltip: Tooltip,
    pub series: Vec<GraphSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub background_color: String,
    pub text: String,
    pub text_style: TextStyle,
    pub subtext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: u32,
    pub font_weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub text_style: TextColor,
    pub background_color: String,
    pub border_width: f64,
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextColor {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSeries {
    #[serde(rename = "type")]
    pub kind: String,
    pub layout: String,
    pub zoom: f64,
    pub node_scale_ratio: f64,
    pub selected_mode: String,
    pub auto_curveness: bool,
    pub animation: bool,
    pub roam: bool,
    pub draggable: bool,
    pub data: Vec<ChartNode>,
    pub links: Vec<ChartLink>,
    pub edge_symbol: [String; 2],
    pub edge_symbol_size: f64,
    pub emphasis: Emphasis,
    pub force: Force,
    pub label_layout: LabelLayout,
    pub label: SeriesLabel,
    pub line_style: Curveness,
    pub select: Select,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Emphasis {
    pub focus: String,
    pub line_style: LineWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineWidth {
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Force {
    pub edge_length: f64,
    pub repulsion: f64,
    pub gravity: f64,
    pub friction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub hide_overlap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLabel {
    pub show: bool,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curveness {
    pub curveness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Select {
    pub line_style: SelectLineStyle,
    pub label: ShowLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectLineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowLabel {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Formatter {
    pub formatter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartNode {
    pub name: String,
    pub symbol_size: f64,
    pub value: f64,
    pub alias: String,
    pub channels: u32,
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub item_style: ItemStyle,
    pub label: Formatter,
    pub tooltip: Formatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub border_color: String,
    pub color: String,
    pub border_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLink {
    pub source: String,
    pub target: String,
    pub value: u64,
    pub tooltip: Formatter,
    pub line_style: LinkLineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLineStyle {
    /// May be NaN or infinite for near-empty channels.
    #[serde(serialize_with = "serialize_lossless_f64")]
    pub width: f64,
    pub color: String,
}

/// JSON has no NaN or infinity; emit them as their names instead of `null`.
fn serialize_lossless_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

pub struct ChartAssembler {
    layout: LayoutConfig,
    style: StyleConfig,
}

impl ChartAssembler {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            style: config.style.clone(),
        }
    }

    pub fn assemble(&self, graph: &Graph, subgraph: &Subgraph, depth: u8) -> ChartSpec {
        let data: Vec<ChartNode> = subgraph.nodes(graph).map(|n| self.chart_node(n)).collect();
        let links: Vec<ChartLink> = subgraph.edges(graph).map(|e| self.chart_link(e)).collect();

        let title = Title {
            background_color: self.style.title_background.clone(),
            text: format!(
                "{} nodes, {} channels within {} hops",
                data.len().saturating_sub(1),
                links.len(),
                depth
            ),
            text_style: TextStyle {
                font_size: self.style.title_font_size,
                font_weight: "normal".to_string(),
            },
            subtext: format!(
                "{} nodes, {} channels total",
                graph.nodes.len(),
                graph.edges.len()
            ),
        };

        let tooltip = Tooltip {
            text_style: TextColor {
                color: self.style.tooltip_text_color.clone(),
            },
            background_color: self.style.tooltip_background.clone(),
            border_width: 0.0,
            trigger: "item".to_string(),
        };

        ChartSpec {
            title,
            tooltip,
            series: vec![self.series(data, links)],
        }
    }

    fn series(&self, data: Vec<ChartNode>, links: Vec<ChartLink>) -> GraphSeries {
        let layout = &self.layout;
        GraphSeries {
            kind: "graph".to_string(),
            layout: "force".to_string(),
            zoom: layout.zoom,
            node_scale_ratio: 1.0,
            selected_mode: "multiple".to_string(),
            auto_curveness: true,
            animation: false,
            roam: true,
            draggable: false,
            data,
            links,
            edge_symbol: ["circle".to_string(), "arrow".to_string()],
            edge_symbol_size: layout.edge_symbol_size,
            emphasis: Emphasis {
                focus: "adjacency".to_string(),
                line_style: LineWidth {
                    width: layout.emphasis_width,
                },
            },
            force: Force {
                edge_length: layout.edge_length,
                repulsion: layout.repulsion,
                gravity: layout.gravity,
                friction: layout.friction,
            },
            label_layout: LabelLayout { hide_overlap: true },
            label: SeriesLabel {
                show: true,
                position: "bottom".to_string(),
            },
            line_style: Curveness {
                curveness: layout.curveness,
            },
            select: Select {
                line_style: SelectLineStyle {
                    color: self.style.select_color.clone(),
                    width: layout.emphasis_width,
                },
                label: ShowLabel { show: true },
            },
        }
    }

    fn chart_node(&self, node: &Node) -> ChartNode {
        ChartNode {
            name: node.id.clone(),
            symbol_size: node.display_size,
            value: node.total_value,
            alias: node.display_name.clone(),
            channels: node.degree,
            fixed: node.is_home,
            x: node.position.map(|p| p.x),
            y: node.position.map(|p| p.y),
            item_style: ItemStyle {
                border_color: node.color.clone(),
                color: self.style.node_fill.clone(),
                border_width: self.style.node_border_width,
            },
            label: Formatter {
                formatter: node.display_name.clone(),
            },
            tooltip: Formatter {
                formatter: format!(
                    "{}<br>{} BTC<br>{} channels",
                    node.label(),
                    display_number(node.total_value),
                    node.degree
                ),
            },
        }
    }

    fn chart_link(&self, edge: &Edge) -> ChartLink {
        ChartLink {
            source: edge.source_id.clone(),
            target: edge.target_id.clone(),
            value: edge.capacity,
            tooltip: Formatter {
                formatter: edge.tooltip_text.clone(),
            },
            line_style: LinkLineStyle {
                width: edge.display_width,
                color: edge.line_color.clone(),
            },
        }
    }
}
