use thiserror::Error;

use crate::GridCoord;

/// Errors raised by the planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("coordinate {coord} is outside the {rows}x{cols} grid")]
    InvalidCoordinate {
        coord: GridCoord,
        rows: usize,
        cols: usize,
    },

    #[error("no traversable route from {origin} to {destination}")]
    PathNotFound {
        origin: GridCoord,
        destination: GridCoord,
    },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

impl NavError {
    /// Whether a later control step, with a fresher map, may succeed where this one failed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NavError::PathNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
