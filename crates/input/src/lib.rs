//! Input: raw key and pointer events mapped to the movement flags the core reads.
//!
//! # Invariants
//! - The core never sees raw key codes, only `InputState` flags and `Action`s.
//! - While paused, key events are ignored; pausing or releasing the pointer
//!   clears every movement flag.

pub mod action;
mod bindings;
mod state;

pub use action::{Action, Binding};
pub use bindings::{Key, KeyBindings};
pub use state::{InputEvent, InputState};
