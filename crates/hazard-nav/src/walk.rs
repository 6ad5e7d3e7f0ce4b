//! Reactive walk-to executor.
//!
//! Each control step observes a fresh semantic map, plans from the agent's cell to the
//! target's cell, and issues a move to only the next cell of the path. With
//! [`ReplanMode::Commit`] the executor instead follows a cached path for a few steps and falls
//! back to replanning as soon as a move fails or the agent drifts off the path.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    GridCoord, MoveParams, MoveStatus, NavError, ObjectId, Path, Planner, SimulatorMut,
    SimulatorView, Vec3,
};

/// What to walk to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkTarget {
    Object(ObjectId),
    Point(Vec3),
}

/// When to rebuild the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReplanMode {
    /// Observe and replan before every move.
    #[default]
    EveryStep,
    /// Follow a planned path for up to `steps` moves before replanning.
    Commit { steps: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Key frames allowed before giving up.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Planar distance to the target that counts as arrived.
    #[serde(default = "default_arrived_at")]
    pub arrived_at: f32,

    /// Arrival tolerance handed to each single-cell move.
    #[serde(default = "default_step_arrived_at")]
    pub step_arrived_at: f32,

    #[serde(default)]
    pub reset_arms: bool,

    #[serde(default)]
    pub replan: ReplanMode,
}

fn default_max_steps() -> u64 {
    100
}
fn default_arrived_at() -> f32 {
    1.0
}
fn default_step_arrived_at() -> f32 {
    0.5
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            arrived_at: default_arrived_at(),
            step_arrived_at: default_step_arrived_at(),
            reset_arms: false,
            replan: ReplanMode::EveryStep,
        }
    }
}

/// Why a walk stopped short of the target.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkFailure {
    #[error("max steps reached")]
    MaxSteps,

    #[error("target position unknown")]
    TargetUnknown,

    #[error("target not in vision or memory")]
    TargetNotObserved,

    #[error("no viable step toward the target")]
    NoViableStep,

    #[error("agent or target outside the map")]
    OutOfBounds,

    #[error("invalid semantic map: {0}")]
    InvalidMap(String),
}

impl From<NavError> for WalkFailure {
    fn from(err: NavError) -> Self {
        match err {
            NavError::InvalidCoordinate { .. } => WalkFailure::OutOfBounds,
            NavError::PathNotFound { .. } => WalkFailure::NoViableStep,
            NavError::DegenerateInput(msg) => WalkFailure::InvalidMap(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkStatus {
    Running,
    Success,
    Failure(WalkFailure),
}

impl WalkStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WalkStatus::Running)
    }
}

/// One issued move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub frame: u64,
    pub origin: GridCoord,
    pub destination: GridCoord,
    pub next: GridCoord,
    /// Length of the path the step was taken from.
    pub path_len: usize,
    /// Whether this step came from a fresh plan rather than a committed one.
    pub replanned: bool,
    pub status: MoveStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkReport {
    pub outcome: WalkStatus,
    pub frames: u64,
    pub steps: Vec<StepRecord>,
}

impl WalkReport {
    pub fn replans(&self) -> usize {
        self.steps.iter().filter(|s| s.replanned).count()
    }
}

#[derive(Debug, Clone)]
struct Committed {
    path: Path,
    next_index: usize,
    remaining: u32,
}

impl Committed {
    /// Next cell of the cached path, if the agent is where the path expects it to be.
    fn advance(&mut self, origin: GridCoord, destination: GridCoord) -> Option<GridCoord> {
        if self.remaining == 0 || self.path.destination() != Some(destination) {
            return None;
        }
        if self.path.cells.get(self.next_index.checked_sub(1)?) != Some(&origin) {
            return None;
        }
        let next = *self.path.cells.get(self.next_index)?;
        self.next_index += 1;
        self.remaining -= 1;
        Some(next)
    }
}

struct PlannedStep {
    next: GridCoord,
    path_len: usize,
    replanned: bool,
}

/// Walks an agent toward a target one cell per control step.
#[derive(Debug, Clone)]
pub struct WalkTo {
    target: WalkTarget,
    config: WalkConfig,
    planner: Planner,
    start_frame: Option<u64>,
    committed: Option<Committed>,
    steps: Vec<StepRecord>,
}

impl WalkTo {
    pub fn new(target: WalkTarget, config: WalkConfig, planner: Planner) -> Self {
        Self {
            target,
            config,
            planner,
            start_frame: None,
            committed: None,
            steps: Vec::new(),
        }
    }

    fn target_position<W: SimulatorView>(&self, world: &W) -> Option<Vec3> {
        match self.target {
            WalkTarget::Object(id) => world.object_position(id),
            WalkTarget::Point(p) => Some(p),
        }
    }

    /// One control step: check arrival and budget, pick the next cell, move there.
    pub fn tick<W: SimulatorMut>(&mut self, world: &mut W) -> WalkStatus {
        let start_frame = *self.start_frame.get_or_insert(world.frame_count());

        let agent = world.agent_position();
        let Some(target) = self.target_position(&*world) else {
            return WalkStatus::Failure(WalkFailure::TargetUnknown);
        };
        if agent.planar_distance(target) < self.config.arrived_at {
            return WalkStatus::Success;
        }
        // Issued moves count too, so a simulator that never advances its frame counter still
        // terminates.
        let elapsed = world
            .frame_count()
            .saturating_sub(start_frame)
            .max(self.steps.len() as u64);
        if elapsed > self.config.max_steps {
            return WalkStatus::Failure(WalkFailure::MaxSteps);
        }

        let frame = world.grid_frame();
        let origin = frame.real_to_grid(agent);
        let destination = frame.real_to_grid(target);

        let committed_next = self
            .committed
            .as_mut()
            .and_then(|c| c.advance(origin, destination).map(|next| (next, c.path.len())));
        let step = match committed_next {
            Some((next, path_len)) => PlannedStep {
                next,
                path_len,
                replanned: false,
            },
            None => match self.replan(world, origin, destination) {
                Ok(step) => step,
                Err(failure) => return WalkStatus::Failure(failure),
            },
        };

        let params = MoveParams {
            arrived_at: self.config.step_arrived_at,
            reset_arms: self.config.reset_arms,
        };
        world.issue_move(frame.grid_to_real(step.next), &params);
        let status = world.next_key_frame();
        // The target object itself blocks its cell; bumping into it from the neighbouring
        // cell is arrival.
        let touched_target = matches!(self.target, WalkTarget::Object(_))
            && step.next == destination
            && status == MoveStatus::Collision;
        if !status.is_success() && !touched_target {
            warn!(%origin, next = %step.next, ?status, "move failed");
            self.committed = None;
        }
        trace!(%origin, %destination, next = %step.next, replanned = step.replanned, "step");

        self.steps.push(StepRecord {
            frame: world.frame_count(),
            origin,
            destination,
            next: step.next,
            path_len: step.path_len,
            replanned: step.replanned,
            status,
        });
        if touched_target {
            debug!(%origin, %destination, "reached target object by contact");
            return WalkStatus::Success;
        }
        WalkStatus::Running
    }

    fn replan<W: SimulatorMut>(
        &mut self,
        world: &mut W,
        origin: GridCoord,
        destination: GridCoord,
    ) -> Result<PlannedStep, WalkFailure> {
        self.committed = None;
        let grid = world.observe();

        if let WalkTarget::Object(id) = self.target {
            let observed = world
                .semantic_id(id)
                .is_some_and(|sid| grid.contains_object(sid));
            if !observed {
                return Err(WalkFailure::TargetNotObserved);
            }
        }

        let path = self
            .planner
            .plan(&grid, origin, destination)?
            .ok_or(WalkFailure::NoViableStep)?;
        let Some(next) = path.next_step() else {
            return Err(WalkFailure::NoViableStep);
        };
        let path_len = path.len();

        if let ReplanMode::Commit { steps } = self.config.replan {
            self.committed = Some(Committed {
                path,
                next_index: 2,
                remaining: steps.saturating_sub(1),
            });
        }

        Ok(PlannedStep {
            next,
            path_len,
            replanned: true,
        })
    }

    /// Tick until the walk succeeds or fails.
    pub fn run<W: SimulatorMut>(mut self, world: &mut W) -> WalkReport {
        let start = world.frame_count();
        let outcome = loop {
            let status = self.tick(world);
            if status.is_terminal() {
                break status;
            }
        };

        let frames = world.frame_count().saturating_sub(start);
        match &outcome {
            WalkStatus::Failure(reason) => {
                info!(%reason, frames, steps = self.steps.len(), "walk failed")
            }
            _ => info!(frames, steps = self.steps.len(), "walk arrived"),
        }

        WalkReport {
            outcome,
            frames,
            steps: self.steps,
        }
    }
}

/// Take at most one step toward `target`; `Running` means a move was issued.
///
/// Arrival is measured on the floor plane (x/z distance), the same test [`WalkTo`] uses, so
/// the target's height above the agent does not count.
pub fn walk_to_single_step<W: SimulatorMut>(
    world: &mut W,
    target: WalkTarget,
    config: WalkConfig,
    planner: &Planner,
) -> WalkStatus {
    WalkTo::new(target, config, planner.clone()).tick(world)
}
