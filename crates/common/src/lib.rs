//! Shared types for the walkthrough controller.
//!
//! # Invariants
//! - Room and door identifiers are plain strings taken from configuration.
//! - Planar helpers ignore the Y axis: the player never moves vertically.

mod types;

pub use types::{DEFAULT_EYE_HEIGHT, DoorId, RoomId, planar, planar_distance};
