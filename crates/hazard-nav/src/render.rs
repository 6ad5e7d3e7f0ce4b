//! Text rendering of a semantic map with an optional path overlay.

use std::collections::BTreeSet;

use crate::{GridCoord, Path, SemanticGrid, WeightConfig};

/// One character per cell: `?` unexplored, `.` floor, `#` too tall, `o` object, `*` path,
/// `A` path origin, `G` path destination.
pub fn ascii(grid: &SemanticGrid, path: Option<&Path>, weights: &WeightConfig) -> String {
    let on_path: BTreeSet<GridCoord> = path
        .map(|p| p.cells.iter().copied().collect())
        .unwrap_or_default();
    let origin = path.and_then(Path::origin);
    let destination = path.and_then(Path::destination);

    let mut out = String::with_capacity(grid.rows() * (grid.cols() + 1));
    for (i, (coord, cell)) in grid.coords().zip(grid.cells()).enumerate() {
        if i > 0 && coord.col == 0 {
            out.push('\n');
        }
        let ch = if Some(coord) == origin {
            'A'
        } else if Some(coord) == destination {
            'G'
        } else if on_path.contains(&coord) {
            '*'
        } else if !cell.explored {
            '?'
        } else if cell.id > weights.object_threshold {
            'o'
        } else if cell.height > weights.height_threshold {
            '#'
        } else {
            '.'
        };
        out.push(ch);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SemanticCell;

    #[test]
    fn draws_path_over_cells() {
        let mut grid = SemanticGrid::filled(2, 3, SemanticCell::FLOOR).unwrap();
        grid.set(GridCoord::new(1, 0), SemanticCell::wall(2.0)).unwrap();
        grid.set(GridCoord::new(1, 2), SemanticCell::UNEXPLORED).unwrap();
        let path = Path::new(vec![
            GridCoord::new(0, 0),
            GridCoord::new(0, 1),
            GridCoord::new(1, 1),
        ]);

        let text = ascii(&grid, Some(&path), &WeightConfig::default());
        assert_eq!(text, "A*.\n#G?\n");
    }
}
