//! Rooms: door configuration, proximity tracking and the room transition state machine.
//!
//! # Invariants
//! - Exactly one room is current at any time.
//! - The active door set is always exactly the doors leaving the current room.
//! - A transition updates the current room and hands back the teleport target
//!   in one call; a refused activation changes nothing.

mod config;
mod proximity;
mod registry;
mod transition;

pub use config::{ConfigError, DEFAULT_DOOR_RADIUS, Door, RoomConfig, RoomDescriptor, load_document};
pub use proximity::{ProximityChange, ProximityResult, ProximityTracker, nearest_door};
pub use registry::{DoorRegistry, RoomError};
pub use transition::{ActivationError, RoomTransitionController, Transition, TransitionState};
