use tracing::debug;

use crate::{
    CostGrid, GridCoord, NavConfig, NavError, Path, PathSearch, Result, SearchConfig,
    SemanticGrid, WeightBuilder, WeightConfig,
};

/// Weight builder and path search behind one call.
///
/// Holds configuration only; every call works on the snapshot it is handed.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    weights: WeightBuilder,
    search: PathSearch,
}

/// Cost grid and search result of one planning call.
#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub weights: CostGrid,
    pub path: Option<Path>,
}

impl PlanOutput {
    pub fn cost(&self) -> Option<f32> {
        self.path.as_ref().map(|p| p.total_cost(&self.weights))
    }
}

impl Planner {
    pub fn new(weights: WeightConfig, search: SearchConfig) -> Self {
        Self {
            weights: WeightBuilder::new(weights),
            search: PathSearch::new(search),
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.weights, config.search)
    }

    pub fn plan(
        &self,
        grid: &SemanticGrid,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<Option<Path>> {
        Ok(self.plan_detailed(grid, origin, destination)?.path)
    }

    /// Like [`Planner::plan`], also returning the cost grid the path was searched on.
    pub fn plan_detailed(
        &self,
        grid: &SemanticGrid,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<PlanOutput> {
        let weights = self.weights.build(grid, origin, destination)?;
        let path = self.search.find_path(&weights, origin, destination)?;
        if path.is_none() {
            debug!(%origin, %destination, "no path on current map");
        }
        Ok(PlanOutput { weights, path })
    }

    /// Treats not-found as [`NavError::PathNotFound`].
    pub fn plan_required(
        &self,
        grid: &SemanticGrid,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<Path> {
        self.plan(grid, origin, destination)?
            .ok_or(NavError::PathNotFound {
                origin,
                destination,
            })
    }
}
