use glam::Vec2;

use crate::action::{Action, Binding};
use crate::bindings::{Key, KeyBindings};

/// A raw event delivered by the host's windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Relative pointer motion in pixels.
    PointerMotion { dx: f32, dy: f32 },
    /// Pointer capture gained or lost.
    PointerLock(bool),
    /// Explicit pause from a menu or overlay.
    Pause(bool),
}

/// Held movement flags plus the unconsumed pointer delta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    look_delta: Vec2,
    pointer_locked: bool,
    paused: bool,
    activate_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input drives the camera only while the pointer is captured and nothing paused it.
    pub fn is_live(&self) -> bool {
        self.pointer_locked && !self.paused
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// True if any of the four movement flags is held.
    pub fn any_movement(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }

    /// Held-key axes: `x` is right minus left, `y` is forward minus back.
    pub fn axes(&self) -> Vec2 {
        Vec2::new(
            f32::from(u8::from(self.right)) - f32::from(u8::from(self.left)),
            f32::from(u8::from(self.forward)) - f32::from(u8::from(self.back)),
        )
    }

    /// Pointer delta accumulated since the last call.
    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    /// Pending activation request, cleared on read.
    pub fn take_activation(&mut self) -> bool {
        std::mem::take(&mut self.activate_requested)
    }

    /// Drop every movement flag and any pending pointer delta.
    pub fn release_movement(&mut self) {
        self.forward = false;
        self.back = false;
        self.left = false;
        self.right = false;
        self.sprint = false;
        self.look_delta = Vec2::ZERO;
    }

    /// Fold one event into the state. Returns the discrete action it produced, if any.
    pub fn apply(&mut self, event: InputEvent, bindings: &KeyBindings) -> Option<Action> {
        match event {
            InputEvent::PointerLock(locked) => {
                if locked == self.pointer_locked {
                    return None;
                }
                self.pointer_locked = locked;
                if !locked {
                    self.release_movement();
                }
                tracing::debug!(locked, "pointer capture changed");
                Some(Action::PointerLock(locked))
            }
            InputEvent::Pause(paused) => {
                if paused == self.paused {
                    return None;
                }
                self.paused = paused;
                if paused {
                    self.release_movement();
                    self.activate_requested = false;
                }
                tracing::debug!(paused, "pause changed");
                Some(Action::Pause(paused))
            }
            InputEvent::PointerMotion { dx, dy } => {
                if self.is_live() && dx.is_finite() && dy.is_finite() {
                    self.look_delta += Vec2::new(dx, dy);
                }
                None
            }
            InputEvent::KeyDown(key) => {
                if self.paused {
                    return None;
                }
                match bindings.lookup(key)? {
                    Binding::Activate => {
                        self.activate_requested = true;
                        Some(Action::Activate)
                    }
                    binding => {
                        self.set_flag(binding, true);
                        None
                    }
                }
            }
            InputEvent::KeyUp(key) => {
                if self.paused {
                    return None;
                }
                if let Some(binding) = bindings.lookup(key) {
                    self.set_flag(binding, false);
                }
                None
            }
        }
    }

    fn set_flag(&mut self, binding: Binding, held: bool) {
        match binding {
            Binding::Forward => self.forward = held,
            Binding::Back => self.back = held,
            Binding::Left => self.left = held,
            Binding::Right => self.right = held,
            Binding::Sprint => self.sprint = held,
            Binding::Activate => {}
        }
    }
}
