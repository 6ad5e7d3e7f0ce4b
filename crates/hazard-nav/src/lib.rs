//! Semantic-map weighting, grid A* and a reactive step executor for embodied agents.
//!
//! The planner turns a per-step semantic occupancy map (explored flag, height and object id
//! per cell) into a traversability cost grid, runs A* over it, and hands the next cell of the
//! resulting path to a simulator-facing step executor that replans every control step.

#![forbid(unsafe_code)]

pub mod config;
pub mod coord;
pub mod cost;
pub mod error;
pub mod frame;
pub mod math;
pub mod path;
pub mod planner;
pub mod render;
pub mod scripted;
pub mod search;
pub mod semantic;
pub mod walk;
pub mod world;

pub use config::{NavConfig, DEFAULT_CONFIG_YAML};
pub use coord::{Connectivity, GridCoord};
pub use cost::{CostGrid, WeightBuilder, WeightConfig};
pub use error::{NavError, Result};
pub use frame::GridFrame;
pub use math::Vec3;
pub use path::Path;
pub use planner::{PlanOutput, Planner};
pub use scripted::ScriptedWorld;
pub use search::{PathSearch, SearchConfig};
pub use semantic::{SemanticCell, SemanticGrid, SemanticLayers};
pub use walk::{
    walk_to_single_step, ReplanMode, StepRecord, WalkConfig, WalkFailure, WalkReport, WalkStatus,
    WalkTarget, WalkTo,
};
pub use world::{MoveParams, MoveStatus, ObjectId, SimulatorMut, SimulatorView};
