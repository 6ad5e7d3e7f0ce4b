//! Deterministic in-memory simulator for tests, benchmarks and the `simulate` command.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{
    GridCoord, GridFrame, MoveParams, MoveStatus, NavError, ObjectId, Result, SemanticCell,
    SemanticGrid, SimulatorMut, SimulatorView, Vec3,
};

/// Height given to `#` cells.
const WALL_HEIGHT: f32 = 1.5;

/// Grid world built from an ASCII layout.
///
/// `.` floor, `#` wall, `A` agent start, `1`-`9` objects (object id and semantic id are the
/// digit). The agent perceives every cell within `sensing_radius` (Chebyshev, no occlusion)
/// after each key frame and remembers what it has seen.
#[derive(Debug, Clone)]
pub struct ScriptedWorld {
    truth: SemanticGrid,
    explored: Vec<bool>,
    frame: GridFrame,
    agent: Vec3,
    objects: BTreeMap<ObjectId, GridCoord>,
    sensing_radius: Option<u32>,
    frame_count: u64,
    pending: Option<Vec3>,
}

impl ScriptedWorld {
    pub fn from_layout(layout: &str, frame: GridFrame) -> Result<Self> {
        let mut rows = Vec::new();
        let mut agent = None;
        let mut objects = BTreeMap::new();

        for (r, line) in layout.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (c, ch) in line.chars().enumerate() {
                let coord = GridCoord::new(r as i32, c as i32);
                let cell = match ch {
                    '.' => SemanticCell::FLOOR,
                    '#' => SemanticCell::wall(WALL_HEIGHT),
                    'A' => {
                        agent = Some(coord);
                        SemanticCell::FLOOR
                    }
                    '1'..='9' => {
                        let id = ch.to_digit(10).unwrap_or_default();
                        objects.insert(ObjectId(id), coord);
                        SemanticCell::object(id as f32)
                    }
                    other => {
                        return Err(NavError::DegenerateInput(format!(
                            "unknown layout cell {other:?} at {coord}"
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        let truth = SemanticGrid::from_rows(rows)?;
        let agent = agent
            .ok_or_else(|| NavError::DegenerateInput("layout has no agent cell 'A'".into()))?;

        let mut world = Self {
            explored: vec![true; truth.cells().len()],
            truth,
            frame,
            agent: frame.grid_to_real(agent),
            objects,
            sensing_radius: None,
            frame_count: 0,
            pending: None,
        };
        world.sense();
        Ok(world)
    }

    /// Start with an unexplored map and reveal cells within `radius` of the agent.
    pub fn with_sensing_radius(mut self, radius: u32) -> Self {
        self.sensing_radius = Some(radius);
        self.explored.iter_mut().for_each(|e| *e = false);
        self.sense();
        self
    }

    pub fn agent_cell(&self) -> GridCoord {
        self.frame.real_to_grid(self.agent)
    }

    /// Change the ground truth, e.g. to drop an obstacle in the agent's way mid-walk.
    pub fn set_cell(&mut self, coord: GridCoord, cell: SemanticCell) -> Result<()> {
        self.truth.set(coord, cell)
    }

    pub fn place_wall(&mut self, coord: GridCoord) -> Result<()> {
        self.set_cell(coord, SemanticCell::wall(WALL_HEIGHT))
    }

    fn sense(&mut self) {
        let Some(radius) = self.sensing_radius else {
            return;
        };
        let at = self.agent_cell();
        let r = radius as i32;
        for d_row in -r..=r {
            for d_col in -r..=r {
                if let Some(idx) = self.truth.index(at.offset(d_row, d_col)) {
                    self.explored[idx] = true;
                }
            }
        }
    }

    fn is_walkable(&self, coord: GridCoord) -> bool {
        self.truth
            .get(coord)
            .is_some_and(|c| c.height <= 0.0 && c.id <= 0.5)
    }
}

impl SimulatorView for ScriptedWorld {
    fn agent_position(&self) -> Vec3 {
        self.agent
    }

    fn object_position(&self, object: ObjectId) -> Option<Vec3> {
        self.objects
            .get(&object)
            .map(|cell| self.frame.grid_to_real(*cell))
    }

    fn semantic_id(&self, object: ObjectId) -> Option<f32> {
        self.objects.contains_key(&object).then_some(object.0 as f32)
    }

    fn grid_frame(&self) -> GridFrame {
        self.frame
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl SimulatorMut for ScriptedWorld {
    fn observe(&mut self) -> SemanticGrid {
        let mut snapshot = self.truth.clone();
        for (cell, explored) in snapshot.cells_mut().iter_mut().zip(&self.explored) {
            if !explored {
                *cell = SemanticCell::UNEXPLORED;
            }
        }
        snapshot
    }

    fn issue_move(&mut self, target: Vec3, _params: &MoveParams) {
        self.pending = Some(target);
    }

    fn next_key_frame(&mut self) -> MoveStatus {
        self.frame_count += 1;
        let Some(target) = self.pending.take() else {
            return MoveStatus::Success;
        };

        let from = self.agent_cell();
        let to = self.frame.real_to_grid(target);
        let status = if from.chebyshev(to) > 1 {
            MoveStatus::Failed
        } else if !self.is_walkable(to) {
            MoveStatus::Collision
        } else {
            self.agent = self.frame.grid_to_real(to);
            MoveStatus::Success
        };
        trace!(%from, %to, ?status, frame = self.frame_count, "scripted move");

        self.sense();
        status
    }
}
