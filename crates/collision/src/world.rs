use std::collections::BTreeMap;

use walkthrough_common::RoomId;

use crate::bounds::WorldBounds;
use crate::collider::{Collider, ColliderError};

/// Handle returned when a collider is registered; used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// Which resolver pass a collider takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// Walls, floor, ceiling, protective barriers. Short lookahead.
    Static,
    /// Artifact volumes registered as their models load. Long lookahead.
    Dynamic,
}

#[derive(Debug)]
struct Entry {
    collider: Box<dyn Collider>,
    kind: ColliderKind,
    room: Option<RoomId>,
}

/// The set of colliders the resolver reads each frame.
///
/// Colliders may be tagged with the room they belong to; untagged colliders
/// are active everywhere, tagged ones only while their room is active.
/// The host appends and removes colliders between frames as content loads
/// and unloads. BTreeMap keeps query order stable across runs.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    entries: BTreeMap<ColliderId, Entry>,
    next_id: u64,
    bounds: Option<WorldBounds>,
    active_room: Option<RoomId>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wall, floor, ceiling or barrier active in every room.
    pub fn add_static(
        &mut self,
        collider: impl Collider + 'static,
    ) -> Result<ColliderId, ColliderError> {
        self.insert(Box::new(collider), ColliderKind::Static, None)
    }

    /// Register an artifact volume active in every room.
    pub fn add_dynamic(
        &mut self,
        collider: impl Collider + 'static,
    ) -> Result<ColliderId, ColliderError> {
        self.insert(Box::new(collider), ColliderKind::Dynamic, None)
    }

    /// Register a collider that only blocks while `room` is active.
    pub fn add_in_room(
        &mut self,
        room: RoomId,
        kind: ColliderKind,
        collider: impl Collider + 'static,
    ) -> Result<ColliderId, ColliderError> {
        self.insert(Box::new(collider), kind, Some(room))
    }

    /// Register an already boxed collider. Malformed geometry is rejected.
    pub fn insert(
        &mut self,
        collider: Box<dyn Collider>,
        kind: ColliderKind,
        room: Option<RoomId>,
    ) -> Result<ColliderId, ColliderError> {
        collider.validate()?;
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        tracing::trace!(?id, ?kind, ?room, "collider registered");
        self.entries.insert(
            id,
            Entry {
                collider,
                kind,
                room,
            },
        );
        Ok(id)
    }

    /// Remove a collider when its geometry is disposed. Returns false if unknown.
    pub fn remove(&mut self, id: ColliderId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every dynamic collider (all artifacts unloaded).
    pub fn clear_dynamic(&mut self) {
        self.entries.retain(|_, e| e.kind != ColliderKind::Dynamic);
    }

    pub fn bounds(&self) -> Option<WorldBounds> {
        self.bounds
    }

    /// Install the outer-wall rectangle checked before any ray is cast.
    pub fn set_bounds(&mut self, bounds: Option<WorldBounds>) {
        self.bounds = bounds;
    }

    pub fn active_room(&self) -> Option<&RoomId> {
        self.active_room.as_ref()
    }

    /// Switch which room-tagged colliders take part in queries.
    pub fn set_active_room(&mut self, room: Option<RoomId>) {
        self.active_room = room;
    }

    /// Total registered colliders of `kind`, active or not.
    pub fn count(&self, kind: ColliderKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Colliders of `kind` that currently block movement.
    pub fn active(&self, kind: ColliderKind) -> impl Iterator<Item = &dyn Collider> + '_ {
        let active_room = self.active_room.as_ref();
        self.entries
            .values()
            .filter(move |e| e.kind == kind)
            .filter(move |e| match &e.room {
                None => true,
                Some(room) => active_room == Some(room),
            })
            .map(|e| e.collider.as_ref())
    }
}
