use std::path::Path;

use serde::{Deserialize, Serialize};
use walkthrough_collision::ResolverConfig;
use walkthrough_input::KeyBindings;
use walkthrough_motion::MotionConfig;
use walkthrough_rooms::{ConfigError, RoomConfig, load_document};

/// Frame deltas longer than this are clamped (tab switches, debugger stops).
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.1;

fn default_max_frame_dt() -> f32 {
    DEFAULT_MAX_FRAME_DT
}

/// Everything a session needs, loadable from one YAML or JSON file.
///
/// Only `world` is required; the tuning sections fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkthroughConfig {
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub collision: ResolverConfig,
    #[serde(default)]
    pub input: KeyBindings,
    #[serde(default = "default_max_frame_dt")]
    pub max_frame_dt: f32,
    pub world: RoomConfig,
}

impl WalkthroughConfig {
    /// Default tuning over the given rooms.
    pub fn with_world(world: RoomConfig) -> Self {
        Self {
            motion: MotionConfig::default(),
            collision: ResolverConfig::default(),
            input: KeyBindings::default(),
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            world,
        }
    }

    /// Default tuning over the built-in museum.
    pub fn museum() -> Result<Self, ConfigError> {
        Ok(Self::with_world(RoomConfig::museum()?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_document(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        let c = &self.collision;
        let positive = [
            ("max_frame_dt", self.max_frame_dt),
            ("motion.base_speed", m.base_speed),
            ("motion.sprint_multiplier", m.sprint_multiplier),
            ("motion.acceleration", m.acceleration),
            ("motion.friction", m.friction),
            ("motion.max_speed", m.max_speed),
            ("motion.look_sensitivity", m.look_sensitivity),
            ("collision.player_radius", c.player_radius),
            ("collision.wall_lookahead", c.wall_lookahead),
            ("collision.artifact_lookahead", c.artifact_lookahead),
        ];
        let non_negative = [
            ("motion.pitch_limit_degrees", m.pitch_limit_degrees),
            ("collision.side_probe_factor", c.side_probe_factor),
            ("collision.diagonal_probe_factor", c.diagonal_probe_factor),
        ];
        let finite = [
            ("motion.eye_height", m.eye_height),
            ("collision.eye_height", c.eye_height),
        ];

        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if m.pitch_limit_degrees > 90.0 {
            return Err(ConfigError::InvalidValue {
                field: "motion.pitch_limit_degrees",
                value: m.pitch_limit_degrees,
            });
        }
        self.world.validate()?;
        self.world.check_clearance(c.player_radius)
    }
}
