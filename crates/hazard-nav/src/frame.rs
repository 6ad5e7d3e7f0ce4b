use serde::{Deserialize, Serialize};

use crate::{GridCoord, Vec3};

/// Placement of the semantic map on the floor plane.
///
/// Rows follow world `x`, columns follow world `z`; a cell spans `cell_size` metres and the
/// offsets shift world zero to the map centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub offset_row: f32,
    #[serde(default)]
    pub offset_col: f32,
}

fn default_cell_size() -> f32 {
    0.25
}

impl Default for GridFrame {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            offset_row: 0.0,
            offset_col: 0.0,
        }
    }
}

impl GridFrame {
    pub fn new(cell_size: f32, offset_row: f32, offset_col: f32) -> Self {
        Self {
            cell_size,
            offset_row,
            offset_col,
        }
    }

    /// Cell containing `p`. May lie outside the map.
    pub fn real_to_grid(&self, p: Vec3) -> GridCoord {
        GridCoord::new(
            (p.x / self.cell_size + self.offset_row).floor() as i32,
            (p.z / self.cell_size + self.offset_col).floor() as i32,
        )
    }

    /// Centre of `cell` on the floor.
    pub fn grid_to_real(&self, cell: GridCoord) -> Vec3 {
        Vec3::planar(
            (cell.row as f32 + 0.5 - self.offset_row) * self.cell_size,
            (cell.col as f32 + 0.5 - self.offset_col) * self.cell_size,
        )
    }
}
