use core::fmt;

use serde::{Deserialize, Serialize};

/// Integer `(row, col)` index into a grid.
///
/// Signed so that world points left of or above the map convert to a coordinate that fails the
/// bounds check instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Chebyshev distance; `1` means 8-connected neighbours.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.col.abs_diff(other.col))
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// Octile distance: the shortest unit-cost route on an 8-connected grid.
    pub fn octile(self, other: Self) -> f32 {
        let dr = self.row.abs_diff(other.row) as f32;
        let dc = self.col.abs_diff(other.col) as f32;
        let (lo, hi) = if dr < dc { (dr, dc) } else { (dc, dr) };
        lo * core::f32::consts::SQRT_2 + (hi - lo)
    }

    /// Whether `other` is reachable from `self` by a single move under `connectivity`.
    pub fn is_adjacent(self, other: Self, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Four => self.manhattan(other) == 1,
            Connectivity::Eight => self.chebyshev(other) == 1,
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Move set used by the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

/// One candidate move out of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Step {
    pub d_row: i32,
    pub d_col: i32,
    pub length: f32,
}

impl Step {
    pub fn is_diagonal(&self) -> bool {
        self.d_row != 0 && self.d_col != 0
    }
}

// Fixed order for determinism: N, E, S, W, then NE, SE, SW, NW.
const STEPS: [Step; 8] = [
    Step { d_row: -1, d_col: 0, length: 1.0 },
    Step { d_row: 0, d_col: 1, length: 1.0 },
    Step { d_row: 1, d_col: 0, length: 1.0 },
    Step { d_row: 0, d_col: -1, length: 1.0 },
    Step { d_row: -1, d_col: 1, length: core::f32::consts::SQRT_2 },
    Step { d_row: 1, d_col: 1, length: core::f32::consts::SQRT_2 },
    Step { d_row: 1, d_col: -1, length: core::f32::consts::SQRT_2 },
    Step { d_row: -1, d_col: -1, length: core::f32::consts::SQRT_2 },
];

impl Connectivity {
    pub(crate) fn steps(self) -> &'static [Step] {
        match self {
            Connectivity::Four => &STEPS[..4],
            Connectivity::Eight => &STEPS[..],
        }
    }

    /// Admissible distance estimate in unit-cost moves.
    pub fn distance(self, a: GridCoord, b: GridCoord) -> f32 {
        match self {
            Connectivity::Four => a.manhattan(b) as f32,
            Connectivity::Eight => a.octile(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_matches_straight_and_diagonal_runs() {
        let a = GridCoord::new(0, 0);
        assert_eq!(a.octile(GridCoord::new(0, 3)), 3.0);
        let d = a.octile(GridCoord::new(2, 5));
        assert!((d - (2.0 * core::f32::consts::SQRT_2 + 3.0)).abs() < 1e-6);
    }

    #[test]
    fn adjacency_depends_on_connectivity() {
        let a = GridCoord::new(2, 2);
        let diag = GridCoord::new(3, 3);
        assert!(a.is_adjacent(diag, Connectivity::Eight));
        assert!(!a.is_adjacent(diag, Connectivity::Four));
        assert!(!a.is_adjacent(a, Connectivity::Eight));
    }

    #[test]
    fn distances_hold_at_the_i32_extremes() {
        let lo = GridCoord::new(i32::MIN, i32::MIN);
        let hi = GridCoord::new(i32::MAX, 0);
        assert_eq!(lo.chebyshev(hi), u32::MAX);
        assert_eq!(hi.chebyshev(lo), u32::MAX);
        assert_eq!(lo.manhattan(hi), u32::MAX);
        assert!(!lo.is_adjacent(hi, Connectivity::Eight));
        assert!(lo.octile(hi).is_finite());
    }

    #[test]
    fn four_connected_steps_are_orthogonal() {
        assert!(Connectivity::Four.steps().iter().all(|s| !s.is_diagonal()));
        assert_eq!(Connectivity::Eight.steps().len(), 8);
    }
}
