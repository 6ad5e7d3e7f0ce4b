//! Traversability weighting of a semantic map.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{GridCoord, NavError, Result, SemanticCell, SemanticGrid};

/// Traversal cost per cell; [`CostGrid::IMPASSABLE`] marks cells the search must not enter.
#[derive(Debug, Clone, PartialEq)]
pub struct CostGrid {
    rows: usize,
    cols: usize,
    costs: Vec<f32>,
}

impl CostGrid {
    /// Sentinel cost of an impassable cell, strictly greater than every finite cost.
    pub const IMPASSABLE: f32 = f32::INFINITY;

    /// Build from raw row-major costs. Costs must be non-negative; NaN is rejected.
    pub fn new(rows: usize, cols: usize, costs: Vec<f32>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(NavError::DegenerateInput(format!(
                "cost grid must be non-empty, got {rows}x{cols}"
            )));
        }
        if costs.len() != rows * cols {
            return Err(NavError::DegenerateInput(format!(
                "cost grid has {} cells, expected {rows}x{cols}",
                costs.len()
            )));
        }
        if let Some((idx, c)) = costs.iter().enumerate().find(|(_, c)| !(**c >= 0.0)) {
            return Err(NavError::DegenerateInput(format!(
                "cell {idx} has invalid cost {c}"
            )));
        }
        Ok(Self { rows, cols, costs })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn costs(&self) -> &[f32] {
        &self.costs
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    pub(crate) fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(coord.row as usize * self.cols + coord.col as usize)
    }

    pub(crate) fn checked_index(&self, coord: GridCoord) -> Result<usize> {
        self.index(coord).ok_or(NavError::InvalidCoordinate {
            coord,
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub(crate) fn coord_of(&self, idx: usize) -> GridCoord {
        GridCoord::new((idx / self.cols) as i32, (idx % self.cols) as i32)
    }

    /// Cost of entering `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: GridCoord) -> Option<f32> {
        self.index(coord).map(|idx| self.costs[idx])
    }

    /// Out-of-bounds cells count as impassable.
    pub fn is_passable(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some_and(f32::is_finite)
    }

    /// Smallest finite cost, used to scale the search heuristic.
    pub fn min_finite_cost(&self) -> Option<f32> {
        self.costs
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .min_by(f32::total_cmp)
    }

    pub fn passable_count(&self) -> usize {
        self.costs.iter().filter(|c| c.is_finite()).count()
    }
}

/// Thresholds turning semantic cells into costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Cells taller than this cannot be walked through or over.
    #[serde(default = "default_height_threshold")]
    pub height_threshold: f32,

    /// Cells whose id exceeds this hold an object.
    #[serde(default = "default_object_threshold")]
    pub object_threshold: f32,

    /// Uniform cost of explored, free, low cells.
    #[serde(default = "default_free_cost")]
    pub free_cost: f32,
}

fn default_height_threshold() -> f32 {
    0.3
}
fn default_object_threshold() -> f32 {
    0.5
}
fn default_free_cost() -> f32 {
    1.0
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            height_threshold: default_height_threshold(),
            object_threshold: default_object_threshold(),
            free_cost: default_free_cost(),
        }
    }
}

/// Converts a [`SemanticGrid`] into a [`CostGrid`].
#[derive(Debug, Clone, Default)]
pub struct WeightBuilder {
    config: WeightConfig,
}

impl WeightBuilder {
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    pub fn is_blocked(&self, cell: &SemanticCell) -> bool {
        !cell.explored
            || cell.id > self.config.object_threshold
            || cell.height > self.config.height_threshold
    }

    /// Weight every cell, then force `origin` and `destination` passable so the agent's own
    /// footprint or the target object never blocks the endpoints.
    pub fn build(
        &self,
        grid: &SemanticGrid,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<CostGrid> {
        if !(self.config.free_cost >= 0.0 && self.config.free_cost.is_finite()) {
            return Err(NavError::DegenerateInput(format!(
                "free cost must be finite and non-negative, got {}",
                self.config.free_cost
            )));
        }

        let origin_idx = grid.checked_index(origin)?;
        let destination_idx = grid.checked_index(destination)?;

        let mut costs: Vec<f32> = grid
            .cells()
            .iter()
            .map(|cell| {
                if self.is_blocked(cell) {
                    CostGrid::IMPASSABLE
                } else {
                    self.config.free_cost
                }
            })
            .collect();

        costs[origin_idx] = self.config.free_cost;
        costs[destination_idx] = self.config.free_cost;

        let weights = CostGrid::new(grid.rows(), grid.cols(), costs)?;
        trace!(
            rows = weights.rows(),
            cols = weights.cols(),
            passable = weights.passable_count(),
            "built cost grid"
        );
        Ok(weights)
    }
}
