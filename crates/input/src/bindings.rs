use serde::{Deserialize, Serialize};

use crate::action::Binding;

/// Physical keys the walkthrough understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    E,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ShiftLeft,
    ShiftRight,
    Space,
}

/// Key-to-control mapping. Several keys may drive the same control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<Key>,
    pub back: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub sprint: Vec<Key>,
    pub activate: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::W, Key::ArrowUp],
            back: vec![Key::S, Key::ArrowDown],
            left: vec![Key::A, Key::ArrowLeft],
            right: vec![Key::D, Key::ArrowRight],
            sprint: vec![Key::ShiftLeft, Key::ShiftRight],
            activate: vec![Key::E],
        }
    }
}

impl KeyBindings {
    /// Resolve a key to its control. The first matching table wins.
    pub fn lookup(&self, key: Key) -> Option<Binding> {
        let tables = [
            (&self.forward, Binding::Forward),
            (&self.back, Binding::Back),
            (&self.left, Binding::Left),
            (&self.right, Binding::Right),
            (&self.sprint, Binding::Sprint),
            (&self.activate, Binding::Activate),
        ];
        tables
            .into_iter()
            .find(|(keys, _)| keys.contains(&key))
            .map(|(_, binding)| binding)
    }

    /// Keys bound to `binding`, in preference order.
    pub fn keys(&self, binding: Binding) -> &[Key] {
        match binding {
            Binding::Forward => &self.forward,
            Binding::Back => &self.back,
            Binding::Left => &self.left,
            Binding::Right => &self.right,
            Binding::Sprint => &self.sprint,
            Binding::Activate => &self.activate,
        }
    }
}
