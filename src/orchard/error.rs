use thiserror::Error;

use super::coord::Coordinate;

/// Failures that abort missing tree detection for a whole orchard
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrchardError {
    #[error("tree {tree} has only {found} distinct neighbours, {required} required")]
    InsufficientNeighbors {
        tree: usize,
        found: usize,
        required: usize,
    },
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("degenerate geometry: coincident points at {0}")]
    DegenerateGeometry(Coordinate),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OrchardError>;
