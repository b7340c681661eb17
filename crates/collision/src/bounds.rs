use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rectangular floor-plan limits of a room's outer walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WorldBounds {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Bounds of a `width` x `depth` room centred on (`center_x`, `center_z`).
    pub fn centered(center_x: f32, center_z: f32, width: f32, depth: f32) -> Self {
        Self::new(
            center_x - width / 2.0,
            center_x + width / 2.0,
            center_z - depth / 2.0,
            center_z + depth / 2.0,
        )
    }

    /// Finite and non-inverted.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.max_x, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_z <= self.max_z
    }

    /// True if a body of radius `buffer` centred at `position` would cross a wall.
    pub fn blocks(&self, position: Vec3, buffer: f32) -> bool {
        position.x < self.min_x + buffer
            || position.x > self.max_x - buffer
            || position.z < self.min_z + buffer
            || position.z > self.max_z - buffer
    }

    /// True if stepping `delta` along X from `x` pushes a body of radius
    /// `buffer` past a side wall. Steps that shrink an existing overlap pass.
    pub fn blocks_x(&self, x: f32, delta: f32, buffer: f32) -> bool {
        crosses(x, delta, self.min_x + buffer, self.max_x - buffer)
    }

    /// Z counterpart of [`WorldBounds::blocks_x`].
    pub fn blocks_z(&self, z: f32, delta: f32, buffer: f32) -> bool {
        crosses(z, delta, self.min_z + buffer, self.max_z - buffer)
    }
}

fn crosses(coord: f32, delta: f32, low: f32, high: f32) -> bool {
    let next = coord + delta;
    (delta < 0.0 && next < low) || (delta > 0.0 && next > high)
}
