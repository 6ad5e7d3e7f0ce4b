//! A* over a [`CostGrid`].

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{Connectivity, CostGrid, GridCoord, Path, Result};

#[derive(Debug)]
struct OpenNode {
    f: f32,
    g: f32,
    coord: GridCoord,
    tie: u64,
}

impl OpenNode {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| self.coord.cmp(&other.coord))
            .then_with(|| self.tie.cmp(&other.tie))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.cmp_key(self)
    }
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Allow a diagonal move past an impassable orthogonal neighbour. Turning this off
    /// requires both cells sharing the corner to be passable.
    #[serde(default = "default_allow_corner_cutting")]
    pub allow_corner_cutting: bool,

    /// Give up (not found) after this many expansions. `None` searches exhaustively.
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            allow_corner_cutting: default_allow_corner_cutting(),
            max_expansions: None,
        }
    }
}

fn default_allow_corner_cutting() -> bool {
    true
}

/// Weighted shortest-path search.
///
/// A move costs the entered cell's weight times the step length (1 orthogonal, sqrt(2)
/// diagonal). The heuristic is octile (or Manhattan) distance scaled by the cheapest finite
/// cell, so it never overestimates and expansions stay optimal.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    config: SearchConfig,
}

impl PathSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// `Ok(None)` when no route exists or an endpoint is impassable; `Err` only for
    /// out-of-bounds endpoints.
    pub fn find_path(
        &self,
        weights: &CostGrid,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<Option<Path>> {
        let origin_idx = weights.checked_index(origin)?;
        let goal_idx = weights.checked_index(destination)?;

        if !weights.is_passable(origin) || !weights.is_passable(destination) {
            debug!(%origin, %destination, "endpoint impassable");
            return Ok(None);
        }
        if origin == destination {
            return Ok(Some(Path::new(vec![origin])));
        }

        let connectivity = self.config.connectivity;
        let scale = weights.min_finite_cost().unwrap_or(0.0);
        let heuristic = |c: GridCoord| connectivity.distance(c, destination) * scale;

        let grid_len = weights.costs().len();
        let mut g_score = vec![f32::INFINITY; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;
        let mut expanded: usize = 0;

        g_score[origin_idx] = 0.0;
        open.push(OpenNode {
            f: heuristic(origin),
            g: 0.0,
            coord: origin,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            let Some(node_idx) = weights.index(node.coord) else {
                continue;
            };
            if node_idx == goal_idx {
                let path = reconstruct_path(weights, &came_from, goal_idx);
                debug!(
                    %origin,
                    %destination,
                    cost = node.g,
                    len = path.len(),
                    expanded,
                    "path found"
                );
                return Ok(Some(path));
            }
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            expanded += 1;
            if self.config.max_expansions.is_some_and(|max| expanded > max) {
                debug!(%origin, %destination, expanded, "expansion limit reached");
                return Ok(None);
            }

            for step in connectivity.steps() {
                let next = node.coord.offset(step.d_row, step.d_col);
                let Some(next_idx) = weights.index(next) else {
                    continue;
                };
                let cost = weights.costs()[next_idx];
                if !cost.is_finite() {
                    continue;
                }
                if step.is_diagonal()
                    && !self.config.allow_corner_cutting
                    && !(weights.is_passable(node.coord.offset(step.d_row, 0))
                        && weights.is_passable(node.coord.offset(0, step.d_col)))
                {
                    continue;
                }

                let tentative_g = node.g + cost * step.length;
                if tentative_g >= g_score[next_idx] {
                    continue;
                }

                came_from[next_idx] = Some(node_idx);
                g_score[next_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g + heuristic(next),
                    g: tentative_g,
                    coord: next,
                    tie,
                });
                tie += 1;
            }
        }

        trace!(%origin, %destination, expanded, "open set exhausted");
        Ok(None)
    }
}

fn reconstruct_path(weights: &CostGrid, came_from: &[Option<usize>], mut current: usize) -> Path {
    let mut out = vec![weights.coord_of(current)];
    while let Some(prev) = came_from[current] {
        current = prev;
        out.push(weights.coord_of(current));
    }
    out.reverse();
    Path::new(out)
}
