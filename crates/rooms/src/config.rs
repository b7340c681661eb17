use std::collections::BTreeSet;
use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use walkthrough_collision::WorldBounds;
use walkthrough_common::{DoorId, RoomId};

/// Activation radius used when a door leaves it out.
pub const DEFAULT_DOOR_RADIUS: f32 = 3.0;

const MUSEUM_YAML: &str = include_str!("../data/museum.yaml");

/// Errors from loading or validating room configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedExtension(String),
    #[error("configuration defines no rooms")]
    NoRooms,
    #[error("duplicate room id: {0}")]
    DuplicateRoom(RoomId),
    #[error("duplicate door id: {0}")]
    DuplicateDoor(DoorId),
    #[error("start room {0} is not defined")]
    UnknownStartRoom(RoomId),
    #[error("door {door} belongs to unknown room {room}")]
    UnknownFromRoom { door: DoorId, room: RoomId },
    #[error("door {door} leads to unknown room {room}")]
    UnknownToRoom { door: DoorId, room: RoomId },
    #[error("room {0} has no doors of its own")]
    RoomWithoutDoors(RoomId),
    #[error("door {door} has non-positive radius {radius}")]
    NonPositiveRadius { door: DoorId, radius: f32 },
    #[error("door {door} has a non-finite {field}")]
    NonFiniteDoor { door: DoorId, field: &'static str },
    #[error("spawn position is not finite")]
    NonFiniteSpawn,
    #[error("room {0} has inverted or non-finite bounds")]
    InvertedBounds(RoomId),
    #[error("door {door} teleports outside the walkable area of room {room}")]
    TargetOutOfBounds { door: DoorId, room: RoomId },
    #[error("spawn position is outside the walkable area of start room {0}")]
    SpawnOutOfBounds(RoomId),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// A named partition of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    pub id: RoomId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Outer-wall rectangle; rooms without one are unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WorldBounds>,
}

/// A one-way hop from `from_room` to `to_room`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub from_room: RoomId,
    pub to_room: RoomId,
    /// Trigger-zone centre and proximity reference point.
    pub anchor: Vec3,
    /// Where the camera lands after the hop.
    pub teleport_to: Vec3,
    #[serde(default = "default_radius")]
    pub radius: f32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_radius() -> f32 {
    DEFAULT_DOOR_RADIUS
}

/// Rooms, doors and where the session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub start_room: RoomId,
    pub spawn: Vec3,
    pub rooms: Vec<RoomDescriptor>,
    #[serde(default)]
    pub doors: Vec<Door>,
}

impl RoomConfig {
    /// The built-in four-room museum layout.
    pub fn museum() -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(MUSEUM_YAML)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_document(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn room(&self, id: &RoomId) -> Option<&RoomDescriptor> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn door(&self, id: &DoorId) -> Option<&Door> {
        self.doors.iter().find(|d| &d.id == id)
    }

    /// Check every cross-reference and numeric field. Runs before the first frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rooms.is_empty() {
            return Err(ConfigError::NoRooms);
        }

        let mut room_ids = BTreeSet::new();
        for room in &self.rooms {
            if !room_ids.insert(&room.id) {
                return Err(ConfigError::DuplicateRoom(room.id.clone()));
            }
            if room.bounds.is_some_and(|b| !b.is_valid()) {
                return Err(ConfigError::InvertedBounds(room.id.clone()));
            }
        }
        if !room_ids.contains(&self.start_room) {
            return Err(ConfigError::UnknownStartRoom(self.start_room.clone()));
        }
        if !self.spawn.is_finite() {
            return Err(ConfigError::NonFiniteSpawn);
        }

        let mut door_ids = BTreeSet::new();
        for door in &self.doors {
            if !door_ids.insert(&door.id) {
                return Err(ConfigError::DuplicateDoor(door.id.clone()));
            }
            if !room_ids.contains(&door.from_room) {
                return Err(ConfigError::UnknownFromRoom {
                    door: door.id.clone(),
                    room: door.from_room.clone(),
                });
            }
            if self.room(&door.to_room).is_none() {
                return Err(ConfigError::UnknownToRoom {
                    door: door.id.clone(),
                    room: door.to_room.clone(),
                });
            }
            if !(door.radius.is_finite() && door.radius > 0.0) {
                return Err(ConfigError::NonPositiveRadius {
                    door: door.id.clone(),
                    radius: door.radius,
                });
            }
            for (field, v) in [("anchor", door.anchor), ("teleport target", door.teleport_to)] {
                if !v.is_finite() {
                    return Err(ConfigError::NonFiniteDoor {
                        door: door.id.clone(),
                        field,
                    });
                }
            }
        }

        for room in &self.rooms {
            if !self.doors.iter().any(|d| d.from_room == room.id) {
                return Err(ConfigError::RoomWithoutDoors(room.id.clone()));
            }
        }
        self.check_clearance(0.0)
    }

    /// Check that the spawn point and every teleport target leave a body of
    /// radius `clearance` inside its room's walls, so the player can move
    /// after arriving.
    pub fn check_clearance(&self, clearance: f32) -> Result<(), ConfigError> {
        let blocked = |room: &RoomId, position: Vec3| {
            self.room(room)
                .and_then(|r| r.bounds)
                .is_some_and(|b| b.blocks(position, clearance))
        };
        if blocked(&self.start_room, self.spawn) {
            return Err(ConfigError::SpawnOutOfBounds(self.start_room.clone()));
        }
        if let Some(door) = self
            .doors
            .iter()
            .find(|d| blocked(&d.to_room, d.teleport_to))
        {
            return Err(ConfigError::TargetOutOfBounds {
                door: door.id.clone(),
                room: door.to_room.clone(),
            });
        }
        Ok(())
    }
}

/// Deserialize a config document, picking the format from the file extension.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let text = std::fs::read_to_string(path)?;
    match ext.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
        "json" => Ok(serde_json::from_str(&text)?),
        _ => Err(ConfigError::UnsupportedExtension(ext)),
    }
}
