//! Seam between the step executor and the simulator.

use serde::{Deserialize, Serialize};

use crate::{GridFrame, SemanticGrid, Vec3};

/// Simulator-side object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Parameters of a single movement command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveParams {
    /// Distance at which the simulator considers the move target reached.
    pub arrived_at: f32,
    pub reset_arms: bool,
}

impl Default for MoveParams {
    fn default() -> Self {
        Self {
            arrived_at: 0.5,
            reset_arms: false,
        }
    }
}

/// Outcome the simulator reports once a key frame has been advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveStatus {
    Success,
    Collision,
    Failed,
}

impl MoveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, MoveStatus::Success)
    }
}

/// Read-only simulator queries.
pub trait SimulatorView {
    fn agent_position(&self) -> Vec3;

    fn object_position(&self, object: ObjectId) -> Option<Vec3>;

    /// Id under which `object` appears in the semantic map.
    fn semantic_id(&self, object: ObjectId) -> Option<f32>;

    fn grid_frame(&self) -> GridFrame;

    /// Key frames advanced so far.
    fn frame_count(&self) -> u64;
}

/// Commands and fresh observations.
pub trait SimulatorMut: SimulatorView {
    /// Rebuild the semantic map from the current observation plus exploration memory.
    fn observe(&mut self) -> SemanticGrid;

    fn issue_move(&mut self, target: Vec3, params: &MoveParams);

    /// Advance simulated time by one control step.
    fn next_key_frame(&mut self) -> MoveStatus;
}
