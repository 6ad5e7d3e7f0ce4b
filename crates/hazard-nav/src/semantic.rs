//! Per-step semantic map snapshot produced by the perception stack.

use serde::{Deserialize, Serialize};

use crate::{GridCoord, NavError, Result};

/// Object ids are renumbered floats; two ids name the same object when they agree this closely.
const ID_EPSILON: f32 = 1e-4;

/// One cell of the semantic map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCell {
    pub explored: bool,
    /// Approximate obstacle/ground elevation.
    pub height: f32,
    /// Renumbered object id; `> 0.5` means an object occupies the cell.
    pub id: f32,
}

impl SemanticCell {
    pub const UNEXPLORED: Self = Self {
        explored: false,
        height: 0.0,
        id: 0.0,
    };

    pub const FLOOR: Self = Self {
        explored: true,
        height: 0.0,
        id: 0.0,
    };

    pub fn wall(height: f32) -> Self {
        Self {
            explored: true,
            height,
            id: 0.0,
        }
    }

    pub fn object(id: f32) -> Self {
        Self {
            explored: true,
            height: 0.0,
            id,
        }
    }
}

/// Rectangular, row-major grid of [`SemanticCell`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticGrid {
    rows: usize,
    cols: usize,
    cells: Vec<SemanticCell>,
}

impl SemanticGrid {
    pub fn new(rows: usize, cols: usize, cells: Vec<SemanticCell>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(NavError::DegenerateInput(format!(
                "semantic grid must be non-empty, got {rows}x{cols}"
            )));
        }
        if cells.len() != rows * cols {
            return Err(NavError::DegenerateInput(format!(
                "semantic grid has {} cells, expected {rows}x{cols}",
                cells.len()
            )));
        }
        for (idx, cell) in cells.iter().enumerate() {
            if !(cell.height >= 0.0 && cell.height.is_finite()) {
                return Err(NavError::DegenerateInput(format!(
                    "cell {idx} has invalid height {}",
                    cell.height
                )));
            }
            if !(cell.id >= 0.0 && cell.id.is_finite()) {
                return Err(NavError::DegenerateInput(format!(
                    "cell {idx} has invalid id {}",
                    cell.id
                )));
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// A grid where every cell holds `cell`.
    pub fn filled(rows: usize, cols: usize, cell: SemanticCell) -> Result<Self> {
        Self::new(rows, cols, vec![cell; rows * cols])
    }

    pub fn from_rows(rows: Vec<Vec<SemanticCell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(NavError::DegenerateInput(format!(
                "row {r} has {} cells, expected {width}",
                row.len()
            )));
        }
        Self::new(height, width, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[SemanticCell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [SemanticCell] {
        &mut self.cells
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

    pub fn get(&self, coord: GridCoord) -> Option<&SemanticCell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    pub fn set(&mut self, coord: GridCoord, cell: SemanticCell) -> Result<()> {
        let idx = self.checked_index(coord)?;
        self.cells[idx] = cell;
        Ok(())
    }

    pub(crate) fn checked_index(&self, coord: GridCoord) -> Result<usize> {
        self.index(coord).ok_or(NavError::InvalidCoordinate {
            coord,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Whether any cell carries object id `id` (i.e. the object is in vision or memory).
    pub fn contains_object(&self, id: f32) -> bool {
        self.cells.iter().any(|c| (c.id - id).abs() < ID_EPSILON)
    }

    /// Coordinates of all cells, row-major.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let cols = self.cols;
        (0..self.rows)
            .flat_map(move |r| (0..cols).map(move |c| GridCoord::new(r as i32, c as i32)))
    }
}

/// On-disk form of a semantic map: three same-shaped layers, as emitted by the map builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticLayers {
    /// Non-zero means explored.
    pub explored: Vec<Vec<f32>>,
    pub height: Vec<Vec<f32>>,
    pub id: Vec<Vec<f32>>,
}

impl TryFrom<SemanticLayers> for SemanticGrid {
    type Error = NavError;

    fn try_from(layers: SemanticLayers) -> Result<Self> {
        let rows = layers.explored.len();
        if layers.height.len() != rows || layers.id.len() != rows {
            return Err(NavError::DegenerateInput(format!(
                "layer row counts differ: explored {rows}, height {}, id {}",
                layers.height.len(),
                layers.id.len()
            )));
        }

        let mut grid = Vec::with_capacity(rows);
        for (r, ((explored, height), id)) in layers
            .explored
            .iter()
            .zip(&layers.height)
            .zip(&layers.id)
            .enumerate()
        {
            if height.len() != explored.len() || id.len() != explored.len() {
                return Err(NavError::DegenerateInput(format!(
                    "layer widths differ on row {r}: explored {}, height {}, id {}",
                    explored.len(),
                    height.len(),
                    id.len()
                )));
            }
            grid.push(
                explored
                    .iter()
                    .zip(height)
                    .zip(id)
                    .map(|((&e, &h), &i)| SemanticCell {
                        explored: e != 0.0,
                        height: h,
                        id: i,
                    })
                    .collect(),
            );
        }

        SemanticGrid::from_rows(grid)
    }
}

impl From<&SemanticGrid> for SemanticLayers {
    fn from(grid: &SemanticGrid) -> Self {
        let mut layers = SemanticLayers::default();
        for row in grid.cells.chunks(grid.cols) {
            layers
                .explored
                .push(row.iter().map(|c| if c.explored { 1.0 } else { 0.0 }).collect());
            layers.height.push(row.iter().map(|c| c.height).collect());
            layers.id.push(row.iter().map(|c| c.id).collect());
        }
        layers
    }
}
