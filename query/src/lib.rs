pub mod chart;
pub mod dsl;
pub mod engine;
pub mod neighborhood;

pub use chart::{ChartAssembler, ChartSpec};
pub use dsl::{RenderRequest, RequestValidationError};
pub use engine::{PanelRenderer, RenderError};
pub use neighborhood::{NeighborhoodExtractor, Subgraph};
