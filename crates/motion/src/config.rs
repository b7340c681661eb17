use serde::{Deserialize, Serialize};
use walkthrough_common::DEFAULT_EYE_HEIGHT;

/// Radians of turn per pixel of pointer motion at sensitivity 1.0.
pub const BASE_LOOK_SENSITIVITY: f32 = 0.002;

/// Ratio between the speed clamp and the walking speed after `set_speed`.
pub const MAX_SPEED_RATIO: f32 = 1.4;

/// Locomotion and look tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Walking speed (units/second).
    pub base_speed: f32,
    /// Applied to both the walking speed and the clamp while sprint is held.
    pub sprint_multiplier: f32,
    /// Blend rate toward the desired velocity while a direction is held.
    pub acceleration: f32,
    /// Blend rate toward rest once no direction is held.
    pub friction: f32,
    /// Velocity magnitude clamp (units/second).
    pub max_speed: f32,
    /// Radians per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Maximum look angle above or below the horizon, in degrees.
    pub pitch_limit_degrees: f32,
    /// Fixed camera height.
    pub eye_height: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            sprint_multiplier: 2.0,
            acceleration: 25.0,
            friction: 12.0,
            max_speed: 7.0,
            look_sensitivity: BASE_LOOK_SENSITIVITY,
            pitch_limit_degrees: 60.0,
            eye_height: DEFAULT_EYE_HEIGHT,
        }
    }
}

impl MotionConfig {
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit_degrees.to_radians()
    }
}
