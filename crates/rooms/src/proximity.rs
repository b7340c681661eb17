use glam::Vec3;
use walkthrough_common::{DoorId, planar_distance};

use crate::config::Door;
use crate::registry::DoorRegistry;

/// The nearest door in range and how far away it is (planar).
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    pub door: DoorId,
    pub distance: f32,
}

/// Emitted when the nearest door changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProximityChange {
    Exited(DoorId),
    Entered(DoorId),
}

/// Nearest door among `doors` strictly inside its own radius.
///
/// Height is ignored. On equal distances the earlier door wins.
pub fn nearest_door<'a>(
    doors: impl IntoIterator<Item = &'a Door>,
    position: Vec3,
) -> Option<ProximityResult> {
    let mut best: Option<ProximityResult> = None;
    for door in doors {
        let distance = planar_distance(position, door.anchor);
        if !(distance < door.radius) {
            continue;
        }
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(ProximityResult {
                door: door.id.clone(),
                distance,
            });
        }
    }
    best
}

/// Caches the nearest door between frames and reports enter/exit changes.
#[derive(Debug, Clone, Default)]
pub struct ProximityTracker {
    nearest: Option<ProximityResult>,
    changes: Vec<ProximityChange>,
}

impl ProximityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the nearest active door for `position`.
    ///
    /// Queues an exit for the old door and an enter for the new one when they
    /// differ; an unchanged nearest door queues nothing.
    pub fn evaluate(
        &mut self,
        registry: &DoorRegistry,
        position: Vec3,
    ) -> Option<&ProximityResult> {
        let next = nearest_door(registry.active_doors(), position);
        let previous = self.nearest.as_ref().map(|r| &r.door);
        let current = next.as_ref().map(|r| &r.door);
        if previous != current {
            if let Some(old) = previous {
                tracing::debug!(door = %old, "left door range");
                self.changes.push(ProximityChange::Exited(old.clone()));
            }
            if let Some(new) = current {
                tracing::debug!(door = %new, "entered door range");
                self.changes.push(ProximityChange::Entered(new.clone()));
            }
        }
        self.nearest = next;
        self.nearest.as_ref()
    }

    /// Last evaluated nearest door.
    pub fn nearest(&self) -> Option<&ProximityResult> {
        self.nearest.as_ref()
    }

    /// Forget the cached door, queueing an exit if there was one.
    pub fn clear(&mut self) {
        if let Some(old) = self.nearest.take() {
            tracing::debug!(door = %old.door, "door range cleared");
            self.changes.push(ProximityChange::Exited(old.door));
        }
    }

    /// Drain queued enter/exit changes in the order they happened.
    pub fn drain_changes(&mut self) -> Vec<ProximityChange> {
        std::mem::take(&mut self.changes)
    }
}
