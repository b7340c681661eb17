//! Motion: camera orientation and velocity integration from held input.
//!
//! # Invariants
//! - Pitch stays within the configured limit; yaw is never wrapped or clamped.
//! - Roll is always zero.
//! - The integrator proposes velocity only; collision decides where the camera ends up.

mod camera;
mod config;
mod integrator;

pub use camera::CameraState;
pub use config::MotionConfig;
pub use integrator::MotionIntegrator;
