use glam::{Vec2, Vec3};
use std::fmt;

use crate::ray::Ray;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Errors from registering malformed geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColliderError {
    #[error("{0} has non-finite coordinates")]
    NonFinite(&'static str),
    #[error("box min {min:?} exceeds max {max:?}")]
    InvertedBox { min: Vec3, max: Vec3 },
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },
    #[error("triangle mesh has no triangles")]
    EmptyMesh,
    #[error("triangle index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },
}

/// Anything the resolver can cast a ray against.
///
/// Concrete geometry (boxes, barrier posts, loaded meshes, groups of those)
/// is adapted to this one capability. Only surfaces a ray enters count as
/// hits: a ray starting inside a closed volume reports nothing for it.
pub trait Collider: fmt::Debug {
    /// Distance along `ray` to the nearest surface it enters at or beyond the origin.
    fn ray_distance(&self, ray: &Ray) -> Option<f32>;

    /// True if `point` lies inside the volume. Open geometry has no inside.
    fn contains(&self, _point: Vec3) -> bool {
        false
    }

    /// Reject geometry the ray queries cannot handle.
    fn validate(&self) -> Result<(), ColliderError>;
}

fn keep_nearest(best: &mut Option<f32>, t: f32) {
    if t >= 0.0 && best.is_none_or(|b| t < b) {
        *best = Some(t);
    }
}

/// Axis-aligned box: walls, floor, ceiling, display cases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }
}

impl Collider for Aabb {
    fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let origin = ray.origin.to_array();
        let dir = ray.direction().to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        for axis in 0..3 {
            if dir[axis].abs() < PARALLEL_EPSILON {
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - origin[axis]) / dir[axis];
            let t2 = (max[axis] - origin[axis]) / dir[axis];
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
            if t_enter > t_exit {
                return None;
            }
        }

        (t_enter >= 0.0).then_some(t_enter)
    }

    fn contains(&self, point: Vec3) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }

    fn validate(&self) -> Result<(), ColliderError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ColliderError::NonFinite("box"));
        }
        if self.min.cmpgt(self.max).any() {
            return Err(ColliderError::InvertedBox {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Sphere, used as a bounding proxy for compact artifacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Collider for Sphere {
    fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (c >= 0.0 && t >= 0.0).then_some(t)
    }

    fn contains(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    fn validate(&self) -> Result<(), ColliderError> {
        if !self.center.is_finite() || !self.radius.is_finite() {
            return Err(ColliderError::NonFinite("sphere"));
        }
        if self.radius <= 0.0 {
            return Err(ColliderError::NonPositive {
                what: "sphere radius",
                value: self.radius,
            });
        }
        Ok(())
    }
}

/// Upright capped cylinder: barrier posts and the no-go ring around an artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Centre of the bottom cap.
    pub base: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Cylinder {
    pub fn new(base: Vec3, radius: f32, height: f32) -> Self {
        Self {
            base,
            radius,
            height,
        }
    }
}

impl Collider for Cylinder {
    fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        if self.contains(ray.origin) {
            return None;
        }
        let dir = ray.direction();
        let rel = ray.origin - self.base;
        let y_min = 0.0;
        let y_max = self.height;
        let r2 = self.radius * self.radius;
        let mut best = None;

        // Side wall.
        let d2 = Vec2::new(dir.x, dir.z);
        let o2 = Vec2::new(rel.x, rel.z);
        let a = d2.length_squared();
        if a > PARALLEL_EPSILON {
            let b = o2.dot(d2);
            let c = o2.length_squared() - r2;
            let disc = b * b - a * c;
            if disc >= 0.0 {
                let sq = disc.sqrt();
                for t in [(-b - sq) / a, (-b + sq) / a] {
                    let y = rel.y + dir.y * t;
                    if (y_min..=y_max).contains(&y) {
                        keep_nearest(&mut best, t);
                    }
                }
            }
        }

        // Caps.
        if dir.y.abs() > PARALLEL_EPSILON {
            for plane in [y_min, y_max] {
                let t = (plane - rel.y) / dir.y;
                let hit = o2 + d2 * t;
                if hit.length_squared() <= r2 {
                    keep_nearest(&mut best, t);
                }
            }
        }

        best
    }

    fn contains(&self, point: Vec3) -> bool {
        let rel = point - self.base;
        rel.y > 0.0
            && rel.y < self.height
            && Vec2::new(rel.x, rel.z).length_squared() < self.radius * self.radius
    }

    fn validate(&self) -> Result<(), ColliderError> {
        if !self.base.is_finite() || !self.radius.is_finite() || !self.height.is_finite() {
            return Err(ColliderError::NonFinite("cylinder"));
        }
        if self.radius <= 0.0 {
            return Err(ColliderError::NonPositive {
                what: "cylinder radius",
                value: self.radius,
            });
        }
        if self.height <= 0.0 {
            return Err(ColliderError::NonPositive {
                what: "cylinder height",
                value: self.height,
            });
        }
        Ok(())
    }
}

/// Indexed triangle soup from a loaded model. Triangles are double sided.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    /// Möller–Trumbore intersection against one triangle.
    fn hit_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let dir = ray.direction();
        let e1 = b - a;
        let e2 = c - a;
        let p = dir.cross(e2);
        let det = e1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

impl Collider for TriangleMesh {
    fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let mut best = None;
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            if let Some(t) = Self::hit_triangle(ray, a, b, c) {
                keep_nearest(&mut best, t);
            }
        }
        best
    }

    fn validate(&self) -> Result<(), ColliderError> {
        if self.indices.is_empty() {
            return Err(ColliderError::EmptyMesh);
        }
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return Err(ColliderError::NonFinite("triangle mesh"));
        }
        let len = self.vertices.len();
        if let Some(&index) = self
            .indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= len)
        {
            return Err(ColliderError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

/// A group of colliders answering as one (a model made of several parts).
#[derive(Debug, Default)]
pub struct Compound {
    parts: Vec<Box<dyn Collider>>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, part: impl Collider + 'static) -> Self {
        self.parts.push(Box::new(part));
        self
    }

    pub fn push(&mut self, part: Box<dyn Collider>) {
        self.parts.push(part);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Collider for Compound {
    fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        self.parts
            .iter()
            .filter_map(|p| p.ray_distance(ray))
            .min_by(f32::total_cmp)
    }

    fn contains(&self, point: Vec3) -> bool {
        self.parts.iter().any(|p| p.contains(point))
    }

    fn validate(&self) -> Result<(), ColliderError> {
        self.parts.iter().try_for_each(|p| p.validate())
    }
}
