use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Camera height above the floor, in world units.
pub const DEFAULT_EYE_HEIGHT: f32 = 1.7;

/// Identifier of a room, as written in the room configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a door descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorId(pub String);

impl DoorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DoorId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Project a world position onto the floor plane (X, Z).
pub fn planar(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Euclidean distance between two positions, ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}
