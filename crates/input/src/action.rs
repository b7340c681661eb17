use serde::{Deserialize, Serialize};

/// A logical control a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
    /// Walk through the nearest door.
    Activate,
}

/// A discrete action produced by applying an input event.
///
/// Held state (movement, sprint, pointer deltas) lives in `InputState`;
/// actions are the edges the session must react to once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The activate key went down while not paused.
    Activate,
    /// Pointer capture was gained (`true`) or lost (`false`).
    PointerLock(bool),
    /// Explicit pause was entered (`true`) or left (`false`).
    Pause(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_compare() {
        assert_eq!(Action::Pause(true), Action::Pause(true));
        assert_ne!(Action::PointerLock(true), Action::PointerLock(false));
    }
}
