use walkthrough_common::{DoorId, RoomId};

use crate::config::{ConfigError, Door, RoomConfig, RoomDescriptor};

/// Errors from switching rooms directly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoomError {
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),
}

/// Door descriptors plus the current room.
///
/// The active subset is always exactly the doors whose `from_room` is the
/// current room, kept in configuration order.
#[derive(Debug, Clone)]
pub struct DoorRegistry {
    rooms: Vec<RoomDescriptor>,
    doors: Vec<Door>,
    current: RoomId,
    active: Vec<usize>,
}

impl DoorRegistry {
    /// Build from configuration, validating it first.
    pub fn new(config: &RoomConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut registry = Self {
            rooms: config.rooms.clone(),
            doors: config.doors.clone(),
            current: config.start_room.clone(),
            active: Vec::new(),
        };
        registry.refresh_active();
        Ok(registry)
    }

    pub fn current_room(&self) -> &RoomId {
        &self.current
    }

    pub fn current_descriptor(&self) -> Option<&RoomDescriptor> {
        self.room(&self.current)
    }

    pub fn room(&self, id: &RoomId) -> Option<&RoomDescriptor> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn rooms(&self) -> &[RoomDescriptor] {
        &self.rooms
    }

    pub fn door(&self, id: &DoorId) -> Option<&Door> {
        self.doors.iter().find(|d| &d.id == id)
    }

    /// Every door, in configuration order.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Doors leaving the current room.
    pub fn active_doors(&self) -> impl Iterator<Item = &Door> + '_ {
        self.active.iter().map(|&i| &self.doors[i])
    }

    pub fn is_active(&self, id: &DoorId) -> bool {
        self.active_doors().any(|d| &d.id == id)
    }

    /// Doors leaving `room`, current or not.
    pub fn doors_from<'a>(&'a self, room: &'a RoomId) -> impl Iterator<Item = &'a Door> + 'a {
        self.doors.iter().filter(move |d| &d.from_room == room)
    }

    /// Make `room` current and recompute the active door set. Returns the
    /// previous room. Unknown ids leave the registry untouched.
    pub fn set_current_room(&mut self, room: RoomId) -> Result<RoomId, RoomError> {
        if self.room(&room).is_none() {
            return Err(RoomError::UnknownRoom(room));
        }
        let previous = std::mem::replace(&mut self.current, room);
        self.refresh_active();
        tracing::trace!(
            from = %previous,
            to = %self.current,
            doors = self.active.len(),
            "active door set refreshed"
        );
        Ok(previous)
    }

    fn refresh_active(&mut self) {
        self.active = self
            .doors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.from_room == self.current)
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn museum() -> DoorRegistry {
        DoorRegistry::new(&RoomConfig::museum().unwrap()).unwrap()
    }

    fn active_ids(r: &DoorRegistry) -> Vec<&str> {
        r.active_doors().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn starts_in_start_room_with_its_doors() {
        let r = museum();
        assert_eq!(r.current_room().as_str(), "main");
        assert_eq!(
            active_ids(&r),
            ["main_to_modern", "main_to_sculpture", "main_to_temporary"]
        );
        assert_eq!(r.current_descriptor().unwrap().id.as_str(), "main");
    }

    #[test]
    fn switching_rooms_swaps_active_doors() {
        let mut r = museum();
        let prev = r.set_current_room(RoomId::from("modern")).unwrap();
        assert_eq!(prev.as_str(), "main");
        assert_eq!(active_ids(&r), ["modern_to_main"]);
        assert!(!r.is_active(&DoorId::from("main_to_modern")));
        assert!(r.door(&DoorId::from("main_to_modern")).is_some());
    }

    #[test]
    fn active_set_matches_from_room_in_every_room() {
        let mut r = museum();
        let ids: Vec<RoomId> = r.rooms().iter().map(|room| room.id.clone()).collect();
        for id in ids {
            r.set_current_room(id.clone()).unwrap();
            let expected: Vec<&Door> = r.doors().iter().filter(|d| d.from_room == id).collect();
            let active: Vec<&Door> = r.active_doors().collect();
            assert_eq!(active, expected);
            assert_eq!(r.doors_from(&id).count(), expected.len());
        }
    }

    #[test]
    fn unknown_room_leaves_state_untouched() {
        let mut r = museum();
        let err = r.set_current_room(RoomId::from("gift_shop")).unwrap_err();
        assert_eq!(err, RoomError::UnknownRoom(RoomId::from("gift_shop")));
        assert_eq!(r.current_room().as_str(), "main");
        assert_eq!(active_ids(&r).len(), 3);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut c = RoomConfig::museum().unwrap();
        c.doors.retain(|d| d.from_room.as_str() != "temporary");
        assert!(matches!(
            DoorRegistry::new(&c),
            Err(ConfigError::RoomWithoutDoors(_))
        ));
    }
}
