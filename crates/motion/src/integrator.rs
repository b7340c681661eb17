use glam::{Vec2, Vec3};
use walkthrough_input::InputState;

use crate::camera::CameraState;
use crate::config::{BASE_LOOK_SENSITIVITY, MAX_SPEED_RATIO, MotionConfig};

/// Turns held input and pointer deltas into orientation and a smoothed velocity.
///
/// Owns the camera. It never moves the camera on its own: the frame driver
/// resolves `velocity * dt` against the collision world and hands the result
/// back through [`MotionIntegrator::commit_position`].
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    config: MotionConfig,
    camera: CameraState,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig, spawn: Vec3) -> Self {
        Self {
            config,
            camera: CameraState::new(spawn),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn speed(&self) -> f32 {
        self.camera.speed()
    }

    /// Apply a pointer delta. Yaw is free; pitch is clamped; roll stays zero.
    pub fn look(&mut self, delta: Vec2) {
        self.camera.yaw -= delta.x * self.config.look_sensitivity;
        self.set_pitch(self.camera.pitch - delta.y * self.config.look_sensitivity);
    }

    /// Velocity the held keys ask for, before smoothing.
    pub fn desired_velocity(&self, input: &InputState) -> Vec3 {
        let axes = input.axes();
        if axes == Vec2::ZERO {
            return Vec3::ZERO;
        }
        let wish = self.camera.forward() * axes.y + self.camera.right() * axes.x;
        wish.normalize_or_zero() * self.walk_speed(input.sprint)
    }

    /// Blend the current velocity toward the desired one and clamp it.
    /// Returns the new velocity.
    pub fn integrate(&mut self, input: &InputState, dt: f32) -> Vec3 {
        let target = self.desired_velocity(input);
        let rate = if input.axes() == Vec2::ZERO {
            self.config.friction
        } else {
            self.config.acceleration
        };
        let blend = 1.0 - (-rate * dt).exp();

        let mut velocity = self.camera.velocity.lerp(target, blend);
        velocity.y = 0.0;
        velocity = velocity.clamp_length_max(self.speed_limit(input.sprint));
        self.camera.velocity = velocity;
        velocity
    }

    /// Zero the velocity on axes the resolver refused.
    pub fn block_axes(&mut self, block_x: bool, block_z: bool) {
        if block_x {
            self.camera.velocity.x = 0.0;
        }
        if block_z {
            self.camera.velocity.z = 0.0;
        }
    }

    /// Stop dead (pause, pointer release).
    pub fn halt(&mut self) {
        self.camera.velocity = Vec3::ZERO;
    }

    /// Accept the resolved horizontal position; height snaps back to eye level.
    pub fn commit_position(&mut self, position: Vec3) {
        self.camera.position = Vec3::new(position.x, self.config.eye_height, position.z);
    }

    /// Place the camera exactly at `position` and stop it.
    pub fn teleport(&mut self, position: Vec3) {
        tracing::debug!(?position, "camera teleported");
        self.camera.position = position;
        self.camera.velocity = Vec3::ZERO;
    }

    /// Roll back to a previously captured camera.
    pub fn restore(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    /// Change walking speed; the clamp follows at 1.4x.
    pub fn set_speed(&mut self, speed: f32) {
        self.config.base_speed = speed;
        self.config.max_speed = speed * MAX_SPEED_RATIO;
    }

    /// Scale look sensitivity relative to the default.
    pub fn set_sensitivity(&mut self, multiplier: f32) {
        self.config.look_sensitivity = BASE_LOOK_SENSITIVITY * multiplier;
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.camera.yaw = yaw;
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        let limit = self.config.pitch_limit();
        self.camera.pitch = pitch.clamp(-limit, limit);
    }

    pub fn reset_rotation(&mut self) {
        self.camera.yaw = 0.0;
        self.camera.pitch = 0.0;
    }

    /// Turn to face `target`, clamping pitch. No-op if `target` is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.camera.position;
        let horizontal = Vec2::new(dir.x, dir.z).length();
        if horizontal == 0.0 && dir.y == 0.0 {
            return;
        }
        if horizontal > 0.0 {
            self.camera.yaw = (-dir.x).atan2(-dir.z);
        }
        self.set_pitch(dir.y.atan2(horizontal));
    }

    fn walk_speed(&self, sprint: bool) -> f32 {
        if sprint {
            self.config.base_speed * self.config.sprint_multiplier
        } else {
            self.config.base_speed
        }
    }

    fn speed_limit(&self, sprint: bool) -> f32 {
        if sprint {
            self.config.max_speed * self.config.sprint_multiplier
        } else {
            self.config.max_speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use walkthrough_input::{InputEvent, Key, KeyBindings};

    const DT: f32 = 1.0 / 60.0;

    fn held(keys: &[Key]) -> InputState {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.apply(InputEvent::PointerLock(true), &bindings);
        for &k in keys {
            input.apply(InputEvent::KeyDown(k), &bindings);
        }
        input
    }

    fn spawn() -> MotionIntegrator {
        MotionIntegrator::new(MotionConfig::default(), Vec3::new(0.0, 1.7, 0.0))
    }

    #[test]
    fn forward_for_one_second_approaches_but_never_exceeds_max() {
        let config = MotionConfig {
            base_speed: 7.0,
            ..MotionConfig::default()
        };
        let mut m = MotionIntegrator::new(config, Vec3::new(0.0, 1.7, 0.0));
        m.set_yaw(PI);
        let input = held(&[Key::W]);
        for _ in 0..60 {
            let v = m.integrate(&input, DT);
            assert!(v.length() <= 7.0 + 1e-4);
        }
        let v = m.camera().velocity;
        assert!(v.length() > 6.9);
        assert!(v.z > 0.0, "facing +Z should move along +Z, got {v:?}");
        assert!(v.x.abs() < 1e-3);
    }

    #[test]
    fn default_walk_settles_at_base_speed() {
        let mut m = spawn();
        let input = held(&[Key::W]);
        for _ in 0..120 {
            m.integrate(&input, DT);
        }
        assert!((m.speed() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut m = spawn();
        let input = held(&[Key::W, Key::D]);
        let v = m.desired_velocity(&input);
        assert!((v.length() - 5.0).abs() < 1e-4);
        for _ in 0..120 {
            m.integrate(&input, DT);
        }
        assert!(m.speed() <= 7.0 + 1e-4);
    }

    #[test]
    fn no_input_decays_monotonically_without_reversal() {
        let mut m = spawn();
        let walk = held(&[Key::W, Key::A]);
        for _ in 0..30 {
            m.integrate(&walk, DT);
        }
        let start = m.camera().velocity;
        assert!(start.length() > 1.0);

        let idle = held(&[]);
        let mut prev = start;
        for dt in [DT, 0.5, DT, 2.0, DT, 10.0] {
            let v = m.integrate(&idle, dt);
            assert!(v.length() <= prev.length());
            assert!(v.x * start.x >= 0.0 && v.z * start.z >= 0.0);
            assert!(v.is_finite());
            prev = v;
        }
        assert!(prev.length() < 1e-3);
    }

    #[test]
    fn opposing_keys_count_as_no_input() {
        let m = spawn();
        assert_eq!(m.desired_velocity(&held(&[Key::W, Key::S])), Vec3::ZERO);
    }

    #[test]
    fn sprint_raises_speed_and_clamp() {
        let mut m = spawn();
        let input = held(&[Key::W, Key::ShiftLeft]);
        for _ in 0..240 {
            m.integrate(&input, DT);
        }
        assert!((m.speed() - 10.0).abs() < 1e-2);
    }

    #[test]
    fn pitch_clamped_yaw_free() {
        let mut m = spawn();
        let limit = 60.0_f32.to_radians();
        m.look(Vec2::new(0.0, -100_000.0));
        assert!((m.camera().pitch - limit).abs() < 1e-6);
        m.look(Vec2::new(0.0, 100_000.0));
        assert!((m.camera().pitch + limit).abs() < 1e-6);

        // Several full turns: yaw is never wrapped or clamped.
        m.look(Vec2::new(-20_000.0, 0.0));
        assert!((m.camera().yaw - 40.0).abs() < 1e-3);
        m.look(Vec2::new(40_000.0, 0.0));
        assert!((m.camera().yaw + 40.0).abs() < 1e-3);
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut m = spawn();
        m.look(Vec2::new(100.0, 0.0));
        // Facing -Z, turning right swings forward toward +X.
        assert!(m.camera().forward().x > 0.0);
    }

    #[test]
    fn block_axes_zeroes_components() {
        let mut m = spawn();
        let input = held(&[Key::W, Key::D]);
        m.integrate(&input, DT);
        m.block_axes(true, false);
        assert_eq!(m.camera().velocity.x, 0.0);
        assert!(m.camera().velocity.z != 0.0);
    }

    #[test]
    fn commit_pins_eye_height_teleport_is_exact() {
        let mut m = spawn();
        m.commit_position(Vec3::new(3.0, 9.0, -2.0));
        assert_eq!(m.camera().position, Vec3::new(3.0, 1.7, -2.0));

        m.integrate(&held(&[Key::W]), DT);
        m.teleport(Vec3::new(-16.0, 1.6, 0.0));
        assert_eq!(m.camera().position, Vec3::new(-16.0, 1.6, 0.0));
        assert_eq!(m.camera().velocity, Vec3::ZERO);
    }

    #[test]
    fn set_speed_and_sensitivity() {
        let mut m = spawn();
        m.set_speed(10.0);
        assert_eq!(m.config().base_speed, 10.0);
        assert!((m.config().max_speed - 14.0).abs() < 1e-5);
        m.set_sensitivity(2.0);
        assert!((m.config().look_sensitivity - 0.004).abs() < 1e-7);
    }

    #[test]
    fn look_at_faces_target_with_clamped_pitch() {
        let mut m = spawn();
        m.look_at(Vec3::new(0.0, 1.7, 10.0));
        assert!((m.camera().forward() - Vec3::Z).length() < 1e-5);
        assert!(m.camera().pitch.abs() < 1e-6);

        m.look_at(Vec3::new(0.0, 100.0, 0.1));
        assert!((m.camera().pitch - 60.0_f32.to_radians()).abs() < 1e-5);

        m.reset_rotation();
        assert_eq!((m.camera().yaw, m.camera().pitch), (0.0, 0.0));
    }
}
