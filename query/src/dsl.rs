use serde::{Deserialize, Serialize};
use thiserror::Error;

use lnviz_core::config::{TerminalNeighbors, TraversalConfig};

const DEFAULT_DEPTH: u8 = 2;
const DEFAULT_MIN_DEGREE: u32 = 2;
const DEFAULT_MAX_DEGREE: u32 = 30;
const MAX_DEPTH: u8 = 16;

/// Traversal parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderRequest {
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default = "default_min_degree")]
    pub min_degree: u32,
    #[serde(default = "default_max_degree")]
    pub max_degree: u32,
    #[serde(default)]
    pub terminal_neighbors: TerminalNeighbors,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            min_degree: default_min_degree(),
            max_degree: default_max_degree(),
            terminal_neighbors: TerminalNeighbors::default(),
        }
    }
}

impl From<&TraversalConfig> for RenderRequest {
    fn from(config: &TraversalConfig) -> Self {
        Self {
            depth: config.depth,
            min_degree: config.min_degree,
            max_degree: config.max_degree,
            terminal_neighbors: config.terminal_neighbors,
        }
    }
}

const fn default_depth() -> u8 {
    DEFAULT_DEPTH
}

const fn default_min_degree() -> u32 {
    DEFAULT_MIN_DEGREE
}

const fn default_max_degree() -> u32 {
    DEFAULT_MAX_DEGREE
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("depth must be at most {0}")]
    InvalidDepth(u8),
    #[error("min_degree ({0}) must be <= max_degree ({1})")]
    InvalidDegreeRange(u32, u32),
}

impl RenderRequest {
    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.depth > MAX_DEPTH {
            return Err(RequestValidationError::InvalidDepth(MAX_DEPTH));
        }
        if self.min_degree > self.max_degree {
            return Err(RequestValidationError::InvalidDegreeRange(
                self.min_degree,
                self.max_degree,
            ));
        }
        Ok(())
    }

    /// Whether a neighbor with `degree` channels may be expanded further.
    pub fn admits(&self, degree: u32) -> bool {
        (self.min_degree..=self.max_degree).contains(&degree)
    }
}
