use glam::Vec3;
use walkthrough_common::{DoorId, RoomId};

use crate::proximity::ProximityTracker;
use crate::registry::{DoorRegistry, RoomError};

/// Why an activation was refused. None of these change any state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivationError {
    #[error("no door within reach")]
    NoDoorNearby,
    #[error("a room transition is already in progress")]
    AlreadyTransitioning,
    #[error("door {0} does not leave the current room")]
    StaleDoor(DoorId),
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Transitioning,
}

/// A completed hop. The caller moves the camera to `teleport_to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: RoomId,
    pub to: RoomId,
    pub door: DoorId,
    pub teleport_to: Vec3,
}

/// Idle/Transitioning state machine guarding room hops.
///
/// A successful [`activate`](Self::activate) leaves the controller
/// `Transitioning` until [`settle`](Self::settle) is called at the start of
/// the next frame, so a second activation in the same frame is refused.
#[derive(Debug, Clone, Default)]
pub struct RoomTransitionController {
    state: TransitionState,
    completed: u64,
}

impl RoomTransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    /// Number of successful transitions so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Hop through the tracker's nearest door.
    ///
    /// On success the registry's current room is the door's destination and
    /// the tracker's cached door is cleared. On failure nothing changes.
    pub fn activate(
        &mut self,
        registry: &mut DoorRegistry,
        tracker: &mut ProximityTracker,
    ) -> Result<Transition, ActivationError> {
        if self.state == TransitionState::Transitioning {
            return Err(ActivationError::AlreadyTransitioning);
        }
        let nearest = tracker.nearest().ok_or(ActivationError::NoDoorNearby)?;
        let door = registry
            .door(&nearest.door)
            .filter(|d| &d.from_room == registry.current_room())
            .ok_or_else(|| ActivationError::StaleDoor(nearest.door.clone()))?;

        let door_id = door.id.clone();
        let to = door.to_room.clone();
        let teleport_to = door.teleport_to;

        let from = registry.set_current_room(to.clone())?;
        self.state = TransitionState::Transitioning;
        self.completed += 1;
        tracker.clear();
        tracing::info!(%from, %to, door = %door_id, "room transition");

        Ok(Transition {
            from,
            to,
            door: door_id,
            teleport_to,
        })
    }

    /// Return to `Idle`. Returns true if a transition was in progress.
    pub fn settle(&mut self) -> bool {
        let was = self.state == TransitionState::Transitioning;
        self.state = TransitionState::Idle;
        was
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;

    fn setup() -> (DoorRegistry, ProximityTracker, RoomTransitionController) {
        let registry = DoorRegistry::new(&RoomConfig::museum().unwrap()).unwrap();
        (registry, ProximityTracker::new(), RoomTransitionController::new())
    }

    #[test]
    fn activate_next_to_door_hops_rooms() {
        let (mut reg, mut tracker, mut ctl) = setup();
        tracker.evaluate(&reg, Vec3::new(18.0, 1.7, 0.0));

        let t = ctl.activate(&mut reg, &mut tracker).unwrap();
        assert_eq!(t.from.as_str(), "main");
        assert_eq!(t.to.as_str(), "modern");
        assert_eq!(t.door.as_str(), "main_to_modern");
        assert_eq!(t.teleport_to, Vec3::new(-16.0, 1.6, 0.0));

        assert_eq!(reg.current_room().as_str(), "modern");
        assert_eq!(ctl.state(), TransitionState::Transitioning);
        assert!(tracker.nearest().is_none());
        assert_eq!(ctl.completed(), 1);
    }

    #[test]
    fn no_door_nearby_is_a_no_op() {
        let (mut reg, mut tracker, mut ctl) = setup();
        tracker.evaluate(&reg, Vec3::new(0.0, 1.7, 0.0));
        assert_eq!(
            ctl.activate(&mut reg, &mut tracker),
            Err(ActivationError::NoDoorNearby)
        );
        assert!(ctl.is_idle());
        assert_eq!(reg.current_room().as_str(), "main");
    }

    #[test]
    fn second_activation_before_settle_is_rejected() {
        let (mut reg, mut tracker, mut ctl) = setup();
        tracker.evaluate(&reg, Vec3::new(18.0, 1.7, 0.0));
        ctl.activate(&mut reg, &mut tracker).unwrap();

        // Even with a door in range of the new room, the hop happens once.
        tracker.evaluate(&reg, Vec3::new(-16.0, 1.6, 0.0));
        assert!(tracker.nearest().is_some());
        assert_eq!(
            ctl.activate(&mut reg, &mut tracker),
            Err(ActivationError::AlreadyTransitioning)
        );
        assert_eq!(reg.current_room().as_str(), "modern");
        assert_eq!(ctl.completed(), 1);

        assert!(ctl.settle());
        assert!(!ctl.settle());
        let back = ctl.activate(&mut reg, &mut tracker).unwrap();
        assert_eq!(back.to.as_str(), "main");
    }

    #[test]
    fn stale_nearest_door_is_refused() {
        let (mut reg, mut tracker, mut ctl) = setup();
        tracker.evaluate(&reg, Vec3::new(18.0, 1.7, 0.0));
        // Room switched behind the tracker's back.
        reg.set_current_room(RoomId::from("sculpture")).unwrap();
        assert_eq!(
            ctl.activate(&mut reg, &mut tracker),
            Err(ActivationError::StaleDoor(DoorId::from("main_to_modern")))
        );
        assert!(ctl.is_idle());
        assert_eq!(reg.current_room().as_str(), "sculpture");
    }
}
