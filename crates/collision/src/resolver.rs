use glam::Vec3;
use serde::{Deserialize, Serialize};
use walkthrough_common::DEFAULT_EYE_HEIGHT;

use crate::collider::Collider;
use crate::ray::Ray;
use crate::world::{ColliderKind, CollisionWorld};

/// Tuning for the per-axis collision test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Radius of the player's vertical column (world units).
    pub player_radius: f32,
    /// Ray length against walls, floor, ceiling and barriers.
    pub wall_lookahead: f32,
    /// Ray length against artifact volumes; artifacts keep a wider berth.
    pub artifact_lookahead: f32,
    /// Offset of the four side probes, as a fraction of `player_radius`.
    pub side_probe_factor: f32,
    /// Offset of the four diagonal probes (per axis), as a fraction of `player_radius`.
    pub diagonal_probe_factor: f32,
    /// Height every probe ray is cast from.
    pub eye_height: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            player_radius: 1.0,
            wall_lookahead: 1.5,
            artifact_lookahead: 2.5,
            side_probe_factor: 0.8,
            diagonal_probe_factor: 0.6,
            eye_height: DEFAULT_EYE_HEIGHT,
        }
    }
}

/// What stopped movement along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// The step pushes the player's column further past an outer wall.
    Bounds,
    /// A probe ray hit a wall, floor, ceiling or barrier.
    Static,
    /// A probe ray hit an artifact volume.
    Dynamic,
}

/// Per-axis verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOutcome {
    Clear,
    Blocked(Blocker),
}

impl AxisOutcome {
    pub fn is_clear(self) -> bool {
        self == Self::Clear
    }
}

/// Result of resolving one frame's displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub x: AxisOutcome,
    pub z: AxisOutcome,
}

impl Resolution {
    /// Apply the permitted part of `displacement` to `position`. Y is untouched.
    pub fn apply(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        let mut next = position;
        if self.x.is_clear() {
            next.x += displacement.x;
        }
        if self.z.is_clear() {
            next.z += displacement.z;
        }
        next
    }

    pub fn any_blocked(&self) -> bool {
        !self.x.is_clear() || !self.z.is_clear()
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Z,
}

impl Axis {
    fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Z => Vec3::Z,
        }
    }
}

/// Tests a proposed displacement axis by axis so the player slides along
/// walls instead of sticking to them.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    config: ResolverConfig,
}

impl CollisionResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Decide, independently for X and Z, whether `displacement` may be applied
    /// from `position`. Pure query; the caller commits the new position.
    pub fn resolve(
        &self,
        world: &CollisionWorld,
        position: Vec3,
        displacement: Vec3,
    ) -> Resolution {
        Resolution {
            x: self.resolve_axis(world, position, Axis::X, displacement.x),
            z: self.resolve_axis(world, position, Axis::Z, displacement.z),
        }
    }

    fn resolve_axis(
        &self,
        world: &CollisionWorld,
        position: Vec3,
        axis: Axis,
        delta: f32,
    ) -> AxisOutcome {
        if delta == 0.0 {
            return AxisOutcome::Clear;
        }
        let direction = axis.unit() * delta.signum();
        let candidate = position + axis.unit() * delta;

        if let Some(bounds) = world.bounds() {
            let radius = self.config.player_radius;
            let crosses = match axis {
                Axis::X => bounds.blocks_x(position.x, delta, radius),
                Axis::Z => bounds.blocks_z(position.z, delta, radius),
            };
            if crosses {
                return AxisOutcome::Blocked(Blocker::Bounds);
            }
        }
        if self.probe(
            world.active(ColliderKind::Static),
            position,
            direction,
            self.config.wall_lookahead,
        ) {
            return AxisOutcome::Blocked(Blocker::Static);
        }
        if self.probe(
            world.active(ColliderKind::Dynamic),
            candidate,
            direction,
            self.config.artifact_lookahead,
        ) {
            return AxisOutcome::Blocked(Blocker::Dynamic);
        }
        AxisOutcome::Clear
    }

    /// Ray origins around the player's column at eye height: centre, four
    /// sides, four diagonals.
    fn probe_origins(&self, center: Vec3) -> [Vec3; 9] {
        let c = Vec3::new(center.x, self.config.eye_height, center.z);
        let s = self.config.player_radius * self.config.side_probe_factor;
        let d = self.config.player_radius * self.config.diagonal_probe_factor;
        [
            c,
            c + Vec3::new(s, 0.0, 0.0),
            c + Vec3::new(-s, 0.0, 0.0),
            c + Vec3::new(0.0, 0.0, s),
            c + Vec3::new(0.0, 0.0, -s),
            c + Vec3::new(d, 0.0, d),
            c + Vec3::new(-d, 0.0, d),
            c + Vec3::new(d, 0.0, -d),
            c + Vec3::new(-d, 0.0, -d),
        ]
    }

    /// True if any probe ray hits a collider strictly closer than `lookahead`.
    /// A collider the player's column already stands in never blocks, so an
    /// overlap can always be walked out of.
    fn probe<'a>(
        &self,
        colliders: impl Iterator<Item = &'a dyn Collider>,
        center: Vec3,
        direction: Vec3,
        lookahead: f32,
    ) -> bool {
        let rays: Vec<Ray> = self
            .probe_origins(center)
            .into_iter()
            .filter_map(|origin| Ray::new(origin, direction))
            .collect();

        let column = Vec3::new(center.x, self.config.eye_height, center.z);

        colliders
            .filter(|collider| !collider.contains(column))
            .any(|collider| {
                rays.iter().any(|ray| match collider.ray_distance(ray) {
                    Some(t) if !t.is_finite() => {
                        tracing::warn!(?collider, "ignoring non-finite ray hit");
                        false
                    }
                    Some(t) => t < lookahead,
                    None => false,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::WorldBounds;
    use crate::collider::{Aabb, Cylinder};
    use walkthrough_common::RoomId;

    const EYE: f32 = DEFAULT_EYE_HEIGHT;

    fn wall_at_x(x: f32) -> Aabb {
        Aabb::new(Vec3::new(x, 0.0, -50.0), Vec3::new(x + 0.2, 8.0, 50.0))
    }

    #[test]
    fn empty_world_blocks_nothing() {
        let world = CollisionWorld::new();
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::new(0.3, 0.0, -0.3));
        assert!(res.x.is_clear() && res.z.is_clear());
        assert_eq!(
            res.apply(Vec3::new(0.0, EYE, 0.0), Vec3::new(0.3, 0.0, -0.3)),
            Vec3::new(0.3, EYE, -0.3)
        );
    }

    #[test]
    fn zero_displacement_trivially_passes() {
        let mut world = CollisionWorld::new();
        // Wall touching the player: any movement toward it would be blocked.
        world.add_static(wall_at_x(0.1)).unwrap();
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::ZERO);
        assert!(!res.any_blocked());
    }

    #[test]
    fn wall_blocks_its_axis_but_not_the_other() {
        let mut world = CollisionWorld::new();
        world.add_static(wall_at_x(1.0)).unwrap();
        let r = CollisionResolver::default();

        let pos = Vec3::new(0.0, EYE, 0.0);
        let disp = Vec3::new(0.1, 0.0, 0.1);
        let res = r.resolve(&world, pos, disp);
        assert_eq!(res.x, AxisOutcome::Blocked(Blocker::Static));
        assert_eq!(res.z, AxisOutcome::Clear);
        assert_eq!(res.apply(pos, disp), Vec3::new(0.0, EYE, 0.1));
    }

    #[test]
    fn moving_away_from_wall_is_allowed() {
        let mut world = CollisionWorld::new();
        world.add_static(wall_at_x(1.0)).unwrap();
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::new(-0.1, 0.0, 0.0));
        assert!(res.x.is_clear());
    }

    #[test]
    fn only_hits_inside_lookahead_block() {
        let r = CollisionResolver::default();
        let pos = Vec3::new(0.0, EYE, 0.0);
        let step = Vec3::new(0.05, 0.0, 0.0);

        // Nearest probe (side probe at +0.8) sees this wall at 1.55.
        let mut far = CollisionWorld::new();
        far.add_static(wall_at_x(2.35)).unwrap();
        assert!(r.resolve(&far, pos, step).x.is_clear());

        // ...and this one at 1.45.
        let mut near = CollisionWorld::new();
        near.add_static(wall_at_x(2.25)).unwrap();
        assert!(!r.resolve(&near, pos, step).x.is_clear());
    }

    #[test]
    fn bounds_block_with_player_radius_buffer() {
        let mut world = CollisionWorld::new();
        world.set_bounds(Some(WorldBounds::new(-19.0, 19.0, -29.0, 29.0)));
        let r = CollisionResolver::default();
        let pos = Vec3::new(17.95, EYE, 0.0);
        let res = r.resolve(&world, pos, Vec3::new(0.1, 0.0, 0.1));
        assert_eq!(res.x, AxisOutcome::Blocked(Blocker::Bounds));
        assert!(res.z.is_clear());
    }

    #[test]
    fn overlapping_artifact_can_be_walked_out_of() {
        let mut world = CollisionWorld::new();
        world
            .add_dynamic(Cylinder::new(Vec3::ZERO, 0.5, 3.0))
            .unwrap();
        world
            .add_static(Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 8.0, 0.3)))
            .unwrap();
        let r = CollisionResolver::default();
        let pos = Vec3::new(0.0, EYE, 0.0);
        for step in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            let res = r.resolve(&world, pos, step * 0.1);
            assert!(!res.any_blocked(), "stuck moving {step}");
        }
    }

    #[test]
    fn column_past_a_wall_may_step_back_in() {
        let mut world = CollisionWorld::new();
        world.set_bounds(Some(WorldBounds::new(-17.5, 17.5, -25.0, 25.0)));
        let r = CollisionResolver::default();
        let pos = Vec3::new(-17.0, EYE, 10.0);

        let res = r.resolve(&world, pos, Vec3::new(0.1, 0.0, 0.1));
        assert!(res.x.is_clear() && res.z.is_clear());
        let res = r.resolve(&world, pos, Vec3::new(-0.1, 0.0, -0.1));
        assert_eq!(res.x, AxisOutcome::Blocked(Blocker::Bounds));
        assert!(res.z.is_clear());
    }

    #[test]
    fn artifacts_use_longer_lookahead() {
        let mut world = CollisionWorld::new();
        // Barrier ring edge 2.1 ahead of the leading candidate probe.
        world
            .add_dynamic(Cylinder::new(Vec3::new(0.0, 0.0, -5.0), 2.0, 3.0))
            .unwrap();
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::new(0.0, 0.0, -0.1));
        assert_eq!(res.z, AxisOutcome::Blocked(Blocker::Dynamic));

        // The same geometry as a wall would not block at that range.
        let mut walls = CollisionWorld::new();
        walls
            .add_static(Cylinder::new(Vec3::new(0.0, 0.0, -5.0), 2.0, 3.0))
            .unwrap();
        let res = r.resolve(&walls, Vec3::new(0.0, EYE, 0.0), Vec3::new(0.0, 0.0, -0.1));
        assert!(res.z.is_clear());
    }

    #[test]
    fn rays_cast_from_fixed_eye_height() {
        let mut world = CollisionWorld::new();
        // Low plinth below eye height never blocks, whatever the camera's y.
        world
            .add_static(Aabb::new(Vec3::new(0.5, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)))
            .unwrap();
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.1, 0.0, 0.0));
        assert!(res.x.is_clear());
    }

    #[test]
    fn inactive_room_geometry_is_ignored() {
        let mut world = CollisionWorld::new();
        world
            .add_in_room(RoomId::from("modern"), ColliderKind::Static, wall_at_x(1.0))
            .unwrap();
        world.set_active_room(Some(RoomId::from("main")));
        let r = CollisionResolver::default();
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::new(0.1, 0.0, 0.0));
        assert!(res.x.is_clear());

        world.set_active_room(Some(RoomId::from("modern")));
        let res = r.resolve(&world, Vec3::new(0.0, EYE, 0.0), Vec3::new(0.1, 0.0, 0.0));
        assert!(!res.x.is_clear());
    }
}
