//! Collision: a queryable set of colliders and the per-axis movement resolver.
//!
//! # Invariants
//! - Every collider answers exactly one question: distance along a ray to its
//!   nearest surface.
//! - Malformed geometry is rejected on registration, so the resolver only ever
//!   sees validated colliders.
//! - An empty world blocks nothing.

mod bounds;
mod collider;
mod ray;
mod resolver;
mod world;

pub use bounds::WorldBounds;
pub use collider::{Aabb, Collider, ColliderError, Compound, Cylinder, Sphere, TriangleMesh};
pub use ray::Ray;
pub use resolver::{AxisOutcome, Blocker, CollisionResolver, Resolution, ResolverConfig};
pub use world::{ColliderId, ColliderKind, CollisionWorld};
