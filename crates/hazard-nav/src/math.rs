use serde::{Deserialize, Serialize};

/// World-space position. The simulator is y-up; the floor plan lives in `x`/`z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the floor plane.
    pub const fn planar(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Distance ignoring height.
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}
