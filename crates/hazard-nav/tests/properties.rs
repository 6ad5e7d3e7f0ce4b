use hazard_nav::{
    Connectivity, CostGrid, GridCoord, PathSearch, Planner, SearchConfig, SemanticCell,
    SemanticGrid, WeightBuilder,
};
use proptest::prelude::*;

const SQRT_2: f32 = core::f32::consts::SQRT_2;

#[derive(Debug, Clone)]
struct Case {
    rows: usize,
    cols: usize,
    costs: Vec<f32>,
    origin: GridCoord,
    destination: GridCoord,
    search: SearchConfig,
}

fn cost_cell() -> impl Strategy<Value = f32> {
    prop_oneof![
        5 => Just(1.0f32),
        2 => Just(2.5f32),
        1 => Just(0.5f32),
        3 => Just(CostGrid::IMPASSABLE),
    ]
}

fn case() -> impl Strategy<Value = Case> {
    (1usize..7, 1usize..7).prop_flat_map(|(rows, cols)| {
        (
            prop::collection::vec(cost_cell(), rows * cols),
            0..rows,
            0..cols,
            0..rows,
            0..cols,
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(move |(costs, or, oc, dr, dc, four, cut)| Case {
                rows,
                cols,
                costs,
                origin: GridCoord::new(or as i32, oc as i32),
                destination: GridCoord::new(dr as i32, dc as i32),
                search: SearchConfig {
                    connectivity: if four {
                        Connectivity::Four
                    } else {
                        Connectivity::Eight
                    },
                    allow_corner_cutting: cut,
                    max_expansions: None,
                },
            })
    })
}

fn cost_at(case: &Case, c: GridCoord) -> f32 {
    if c.row < 0 || c.col < 0 || c.row as usize >= case.rows || c.col as usize >= case.cols {
        return CostGrid::IMPASSABLE;
    }
    case.costs[c.row as usize * case.cols + c.col as usize]
}

/// Cost of moving `from -> to` in the same graph the search uses, if the move exists.
fn edge(case: &Case, from: GridCoord, to: GridCoord) -> Option<f32> {
    let dr = to.row - from.row;
    let dc = to.col - from.col;
    let cost = cost_at(case, to);
    if !cost.is_finite() || (dr == 0 && dc == 0) || dr.abs() > 1 || dc.abs() > 1 {
        return None;
    }
    let diagonal = dr != 0 && dc != 0;
    if diagonal {
        if case.search.connectivity == Connectivity::Four {
            return None;
        }
        if !case.search.allow_corner_cutting
            && !(cost_at(case, from.offset(dr, 0)).is_finite()
                && cost_at(case, from.offset(0, dc)).is_finite())
        {
            return None;
        }
        return Some(cost * SQRT_2);
    }
    Some(cost)
}

/// Bellman-Ford relaxation over every cell; slow but obviously correct.
fn brute_force(case: &Case) -> Option<f32> {
    if !cost_at(case, case.origin).is_finite() || !cost_at(case, case.destination).is_finite() {
        return None;
    }
    let n = case.rows * case.cols;
    let coord = |i: usize| GridCoord::new((i / case.cols) as i32, (i % case.cols) as i32);
    let mut dist = vec![f32::INFINITY; n];
    dist[case.origin.row as usize * case.cols + case.origin.col as usize] = 0.0;

    for _ in 0..n {
        let mut changed = false;
        for u in 0..n {
            if !dist[u].is_finite() {
                continue;
            }
            for v in 0..n {
                if let Some(w) = edge(case, coord(u), coord(v)) {
                    if dist[u] + w < dist[v] - 1e-6 {
                        dist[v] = dist[u] + w;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    let d = dist[case.destination.row as usize * case.cols + case.destination.col as usize];
    d.is_finite().then_some(d)
}

proptest! {
    #[test]
    fn astar_cost_matches_brute_force(case in case()) {
        let weights = CostGrid::new(case.rows, case.cols, case.costs.clone()).unwrap();
        let search = PathSearch::new(case.search);
        let found = search.find_path(&weights, case.origin, case.destination).unwrap();
        let expected = brute_force(&case);

        match (found, expected) {
            (None, None) => {}
            (Some(path), Some(best)) => {
                prop_assert_eq!(path.origin(), Some(case.origin));
                prop_assert_eq!(path.destination(), Some(case.destination));

                let mut total = 0.0f32;
                for w in path.cells.windows(2) {
                    let step = edge(&case, w[0], w[1]);
                    prop_assert!(step.is_some(), "illegal move {} -> {}", w[0], w[1]);
                    total += step.unwrap();
                }
                prop_assert!((total - best).abs() < 1e-3, "path cost {} vs optimum {}", total, best);
                prop_assert!((path.total_cost(&weights) - total).abs() < 1e-3);
            }
            (found, expected) => {
                prop_assert!(false, "search {:?} disagrees with brute force {:?}", found, expected);
            }
        }
    }

    #[test]
    fn repeated_searches_are_identical(case in case()) {
        let weights = CostGrid::new(case.rows, case.cols, case.costs.clone()).unwrap();
        let search = PathSearch::new(case.search);
        let a = search.find_path(&weights, case.origin, case.destination).unwrap();
        let b = search.find_path(&weights, case.origin, case.destination).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn planned_paths_only_cross_passable_cells(
        (rows, cols, cells) in (2usize..9, 2usize..9).prop_flat_map(|(r, c)| {
            let height = prop_oneof![Just(0.0f32), Just(0.2f32), Just(1.0f32)];
            let id = prop_oneof![3 => Just(0.0f32), 1 => Just(4.0f32)];
            let cell = (any::<bool>(), height, id).prop_map(|(explored, height, id)| SemanticCell {
                explored: explored || height > 0.5,
                height,
                id,
            });
            (Just(r), Just(c), prop::collection::vec(cell, r * c))
        }),
        seed in any::<u64>(),
    ) {
        let grid = SemanticGrid::new(rows, cols, cells).unwrap();
        let origin = GridCoord::new((seed % rows as u64) as i32, ((seed / 7) % cols as u64) as i32);
        let destination = GridCoord::new(((seed / 13) % rows as u64) as i32, ((seed / 31) % cols as u64) as i32);

        let planner = Planner::default();
        let builder = WeightBuilder::default();
        if let Some(path) = planner.plan(&grid, origin, destination).unwrap() {
            prop_assert_eq!(path.origin(), Some(origin));
            prop_assert_eq!(path.destination(), Some(destination));
            if path.len() > 2 {
                for cell in &path.cells[1..path.len() - 1] {
                    prop_assert!(!builder.is_blocked(grid.get(*cell).unwrap()), "blocked cell {} on path", cell);
                }
            }
            for w in path.cells.windows(2) {
                prop_assert!(w[0].is_adjacent(w[1], Connectivity::Eight));
            }
        }
        if origin == destination {
            let path = planner.plan(&grid, origin, destination).unwrap();
            prop_assert_eq!(path.map(|p| p.cells), Some(vec![origin]));
        }
    }
}
