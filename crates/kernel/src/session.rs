use glam::Vec3;
use walkthrough_collision::{CollisionResolver, CollisionWorld, Resolution};
use walkthrough_common::RoomId;
use walkthrough_input::{Action, InputEvent, InputState};
use walkthrough_motion::{CameraState, MotionIntegrator};
use walkthrough_rooms::{
    ActivationError, ConfigError, Door, DoorRegistry, ProximityChange, ProximityResult,
    ProximityTracker, RoomError, RoomTransitionController, Transition, TransitionState,
};

use crate::config::WalkthroughConfig;
use crate::event::WalkEvent;
use crate::stats::FrameStats;

/// A frame that could not be completed. The session keeps its last good state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("invalid frame delta: {0}")]
    InvalidTimestep(f32),
    #[error("camera state became non-finite")]
    NonFiniteCamera,
}

/// What one frame did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Delta actually simulated, after clamping.
    pub dt: f32,
    /// False when the pointer was released or the session paused.
    pub live: bool,
    pub resolution: Option<Resolution>,
    pub nearest: Option<ProximityResult>,
    pub transition: Option<Transition>,
}

/// One walkthrough: the camera, the collision world and the room state.
///
/// Per frame: settle any finished transition, then look and integrate
/// velocity, resolve the displacement against collision, commit the
/// position, re-evaluate door proximity, and finally run a queued
/// activation. Each stage sees the fully updated output of the previous one.
#[derive(Debug)]
pub struct Session {
    config: WalkthroughConfig,
    input: InputState,
    motion: MotionIntegrator,
    world: CollisionWorld,
    resolver: CollisionResolver,
    registry: DoorRegistry,
    tracker: ProximityTracker,
    controller: RoomTransitionController,
    events: Vec<WalkEvent>,
    stats: FrameStats,
}

impl Session {
    /// Validate `config` and place the camera at the configured spawn.
    pub fn new(config: WalkthroughConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = DoorRegistry::new(&config.world)?;
        let motion = MotionIntegrator::new(config.motion.clone(), config.world.spawn);
        let resolver = CollisionResolver::new(config.collision.clone());

        let mut session = Self {
            config,
            input: InputState::new(),
            motion,
            world: CollisionWorld::new(),
            resolver,
            registry,
            tracker: ProximityTracker::new(),
            controller: RoomTransitionController::new(),
            events: Vec::new(),
            stats: FrameStats::default(),
        };
        let start = session.registry.current_room().clone();
        session.install_room(&start);
        tracing::info!(
            room = %start,
            rooms = session.registry.rooms().len(),
            doors = session.registry.doors().len(),
            "walkthrough session started"
        );
        Ok(session)
    }

    pub fn config(&self) -> &WalkthroughConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        self.motion.camera()
    }

    pub fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    /// Camera utilities: speed, sensitivity, orientation, teleport.
    pub fn motion_mut(&mut self) -> &mut MotionIntegrator {
        &mut self.motion
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Add or remove colliders between frames.
    pub fn world_mut(&mut self) -> &mut CollisionWorld {
        &mut self.world
    }

    pub fn registry(&self) -> &DoorRegistry {
        &self.registry
    }

    pub fn current_room(&self) -> &RoomId {
        self.registry.current_room()
    }

    pub fn transition_state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Last evaluated nearest door, for the interaction hint.
    pub fn nearest(&self) -> Option<&ProximityResult> {
        self.tracker.nearest()
    }

    /// Descriptor of the nearest door (label, description).
    pub fn nearest_door(&self) -> Option<&Door> {
        self.tracker
            .nearest()
            .and_then(|n| self.registry.door(&n.door))
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: InputEvent) {
        match self.input.apply(event, &self.config.input) {
            Some(Action::PointerLock(locked)) => {
                if !locked {
                    self.motion.halt();
                }
                self.events.push(WalkEvent::PointerLockChanged(locked));
            }
            Some(Action::Pause(paused)) => {
                if paused {
                    self.motion.halt();
                }
                self.events.push(WalkEvent::PauseChanged(paused));
            }
            Some(Action::Activate) => {
                tracing::trace!("activation queued");
            }
            None => {}
        }
    }

    /// Run one frame of `dt` seconds.
    pub fn frame(&mut self, dt: f32) -> Result<FrameReport, FrameError> {
        let _span = tracing::trace_span!("frame", dt).entered();
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(FrameError::InvalidTimestep(dt));
        }
        let dt = dt.min(self.config.max_frame_dt);

        if self.controller.settle() {
            tracing::trace!(room = %self.registry.current_room(), "transition settled");
        }

        let live = self.input.is_live();
        let resolution = if live {
            Some(self.step_motion(dt)?)
        } else {
            self.motion.halt();
            self.input.release_movement();
            self.input.take_activation();
            None
        };

        let position = self.motion.camera().position;
        let nearest = self.tracker.evaluate(&self.registry, position).cloned();
        self.collect_proximity_changes();

        let mut transition = None;
        if self.input.take_activation() {
            match self.activate() {
                Ok(t) => transition = Some(t),
                Err(e) => tracing::debug!(error = %e, "activation ignored"),
            }
        }

        self.stats.record(dt);
        Ok(FrameReport {
            dt,
            live,
            resolution,
            nearest,
            transition,
        })
    }

    /// Run one frame, logging and counting a failure instead of returning it.
    pub fn tick(&mut self, dt: f32) -> Option<FrameReport> {
        match self.frame(dt) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "frame skipped");
                self.stats.record_failure();
                None
            }
        }
    }

    /// Walk through the nearest door now.
    pub fn activate(&mut self) -> Result<Transition, ActivationError> {
        let transition = self
            .controller
            .activate(&mut self.registry, &mut self.tracker)?;
        self.motion.teleport(transition.teleport_to);
        self.install_room(&transition.to);
        self.collect_proximity_changes();
        self.events.push(WalkEvent::RoomChanged {
            from: transition.from.clone(),
            to: transition.to.clone(),
            door: Some(transition.door.clone()),
        });
        self.stats.record_transition();
        Ok(transition)
    }

    /// Place the camera at `position` and stop it.
    pub fn teleport(&mut self, position: Vec3) {
        self.motion.teleport(position);
    }

    /// Switch rooms without moving the camera.
    pub fn enter_room(&mut self, room: RoomId) -> Result<(), RoomError> {
        let from = self.registry.set_current_room(room.clone())?;
        if from == room {
            return Ok(());
        }
        self.tracker.clear();
        self.collect_proximity_changes();
        self.install_room(&room);
        tracing::info!(%from, to = %room, "room switched");
        self.events.push(WalkEvent::RoomChanged {
            from,
            to: room,
            door: None,
        });
        Ok(())
    }

    /// Take every event queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<WalkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[WalkEvent] {
        &self.events
    }

    fn step_motion(&mut self, dt: f32) -> Result<Resolution, FrameError> {
        let before = *self.motion.camera();

        let look = self.input.take_look_delta();
        self.motion.look(look);
        let velocity = self.motion.integrate(&self.input, dt);
        let displacement = velocity * dt;
        let position = self.motion.camera().position;

        let resolution = self.resolver.resolve(&self.world, position, displacement);
        let (block_x, block_z) = (!resolution.x.is_clear(), !resolution.z.is_clear());
        self.motion.block_axes(block_x, block_z);
        let next = resolution.apply(position, displacement);
        self.motion.commit_position(next);

        if !self.motion.camera().is_finite() {
            self.motion.restore(before);
            return Err(FrameError::NonFiniteCamera);
        }

        let blocked = u64::from(block_x) + u64::from(block_z);
        if blocked > 0 {
            tracing::trace!(?resolution, "movement blocked");
            self.stats.record_blocked(blocked);
        }
        Ok(resolution)
    }

    fn install_room(&mut self, room: &RoomId) {
        let bounds = self.registry.room(room).and_then(|r| r.bounds);
        self.world.set_bounds(bounds);
        self.world.set_active_room(Some(room.clone()));
    }

    fn collect_proximity_changes(&mut self) {
        for change in self.tracker.drain_changes() {
            let event = match change {
                ProximityChange::Entered(door) => {
                    let label = self
                        .registry
                        .door(&door)
                        .map(|d| d.label.clone())
                        .unwrap_or_default();
                    WalkEvent::DoorEntered { door, label }
                }
                ProximityChange::Exited(door) => WalkEvent::DoorExited { door },
            };
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::DEFAULT_MAX_FRAME_DT;
    use walkthrough_collision::{Aabb, ColliderKind};
    use walkthrough_input::Key;

    const DT: f32 = 1.0 / 60.0;

    fn live_session() -> Session {
        let mut s = Session::new(WalkthroughConfig::museum().unwrap()).unwrap();
        s.handle(InputEvent::PointerLock(true));
        s.drain_events();
        s
    }

    #[test]
    fn starts_in_start_room_with_bounds_installed() {
        let s = Session::new(WalkthroughConfig::museum().unwrap()).unwrap();
        assert_eq!(s.current_room().as_str(), "main");
        assert_eq!(s.world().active_room().map(|r| r.as_str()), Some("main"));
        assert!(s.world().bounds().is_some());
        assert_eq!(s.camera().position, Vec3::new(0.0, 1.7, 10.0));
    }

    #[test]
    fn unlocked_session_does_not_move() {
        let mut s = Session::new(WalkthroughConfig::museum().unwrap()).unwrap();
        s.handle(InputEvent::KeyDown(Key::W));
        let report = s.frame(DT).unwrap();
        assert!(!report.live);
        assert!(report.resolution.is_none());
        assert_eq!(s.camera().position, Vec3::new(0.0, 1.7, 10.0));
        assert!(!s.input().any_movement());
    }

    #[test]
    fn walking_moves_the_camera() {
        let mut s = live_session();
        s.handle(InputEvent::KeyDown(Key::W));
        for _ in 0..30 {
            s.frame(DT).unwrap();
        }
        assert!(s.camera().position.z < 10.0);
        assert!(s.camera().speed() > 0.0);
        assert_eq!(s.stats().frames(), 30);
    }

    #[test]
    fn pause_halts_and_ignores_keys() {
        let mut s = live_session();
        s.handle(InputEvent::KeyDown(Key::W));
        for _ in 0..10 {
            s.frame(DT).unwrap();
        }
        s.handle(InputEvent::Pause(true));
        assert_eq!(s.camera().velocity, Vec3::ZERO);
        assert_eq!(s.drain_events(), [WalkEvent::PauseChanged(true)]);

        let before = s.camera().position;
        s.handle(InputEvent::KeyDown(Key::W));
        s.frame(DT).unwrap();
        assert_eq!(s.camera().position, before);

        s.handle(InputEvent::Pause(false));
        let report = s.frame(DT).unwrap();
        assert!(report.live);
        assert_eq!(s.camera().position, before);
    }

    #[test]
    fn invalid_timestep_is_counted_not_fatal() {
        let mut s = live_session();
        assert!(matches!(s.frame(f32::NAN), Err(FrameError::InvalidTimestep(_))));
        assert_eq!(s.frame(-1.0), Err(FrameError::InvalidTimestep(-1.0)));

        assert!(s.tick(f32::INFINITY).is_none());
        assert_eq!(s.stats().failures(), 1);
        assert!(s.tick(DT).is_some());
        assert_eq!(s.stats().frames(), 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut s = live_session();
        let report = s.frame(5.0).unwrap();
        assert_eq!(report.dt, DEFAULT_MAX_FRAME_DT);
    }

    #[test]
    fn room_colliders_follow_transitions() {
        let mut s = live_session();
        s.world_mut()
            .add_in_room(
                RoomId::from("modern"),
                ColliderKind::Static,
                Aabb::new(Vec3::new(-14.0, 0.0, -5.0), Vec3::new(-13.8, 8.0, 5.0)),
            )
            .unwrap();

        s.enter_room(RoomId::from("modern")).unwrap();
        assert_eq!(s.world().active(ColliderKind::Static).count(), 1);
        assert_eq!(
            s.drain_events(),
            [WalkEvent::RoomChanged {
                from: RoomId::from("main"),
                to: RoomId::from("modern"),
                door: None,
            }]
        );

        s.enter_room(RoomId::from("main")).unwrap();
        assert_eq!(s.world().active(ColliderKind::Static).count(), 0);
        assert!(s.enter_room(RoomId::from("vault")).is_err());
        assert_eq!(s.current_room().as_str(), "main");
    }
}
