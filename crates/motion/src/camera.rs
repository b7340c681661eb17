use glam::{EulerRot, Mat4, Quat, Vec3};

/// The first-person camera: where it stands, where it looks, how fast it moves.
///
/// Yaw 0 looks down -Z; positive yaw turns left. Positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Unbounded, radians.
    pub yaw: f32,
    /// Radians, clamped by the integrator.
    pub pitch: f32,
    pub velocity: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    /// Horizontal forward direction (Y zeroed), unit length.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction, unit length.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }

    /// Full view direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-self.yaw.sin() * cp, sp, -self.yaw.cos() * cp)
    }

    /// Orientation with roll fixed at zero.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.look_direction(), Vec3::Y)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.yaw.is_finite()
            && self.pitch.is_finite()
    }
}
