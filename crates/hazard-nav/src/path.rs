use serde::{Deserialize, Serialize};

use crate::{CostGrid, GridCoord};

/// Ordered cells from origin to destination, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub cells: Vec<GridCoord>,
}

impl Path {
    pub fn new(cells: Vec<GridCoord>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn origin(&self) -> Option<GridCoord> {
        self.cells.first().copied()
    }

    pub fn destination(&self) -> Option<GridCoord> {
        self.cells.last().copied()
    }

    /// The first cell beyond the current position; `None` means arrived or no viable step.
    pub fn next_step(&self) -> Option<GridCoord> {
        self.cells.get(1).copied()
    }

    /// Fewer than two cells: nothing left to walk.
    pub fn is_arrived(&self) -> bool {
        self.cells.len() < 2
    }

    /// Sum of entered-cell cost times step length, the quantity the search minimises.
    pub fn total_cost(&self, weights: &CostGrid) -> f32 {
        self.cells
            .windows(2)
            .map(|w| {
                let length = if w[0].row != w[1].row && w[0].col != w[1].col {
                    core::f32::consts::SQRT_2
                } else {
                    1.0
                };
                weights.get(w[1]).unwrap_or(CostGrid::IMPASSABLE) * length
            })
            .sum()
    }
}
