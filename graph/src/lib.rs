pub mod builder;
pub mod index;
pub mod network;
pub mod tables;

pub use builder::{BuildStats, Graph, GraphBuilder, GraphError, RenderContext};
pub use tables::{DataFrame, EdgeTable, Field, NodeTable, PanelSeries, TableError};
