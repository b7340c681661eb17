use serde::{Deserialize, Serialize};
use walkthrough_common::{DoorId, RoomId};

/// Something the host UI may react to. Drained once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalkEvent {
    /// A door became the nearest one in range; show its hint.
    DoorEntered { door: DoorId, label: String },
    /// The hinted door is no longer nearest.
    DoorExited { door: DoorId },
    /// The current room changed. `door` is `None` for a direct switch.
    RoomChanged {
        from: RoomId,
        to: RoomId,
        door: Option<DoorId>,
    },
    PointerLockChanged(bool),
    PauseChanged(bool),
}
