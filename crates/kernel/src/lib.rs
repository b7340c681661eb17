//! Walkthrough kernel: the per-frame driver over input, motion, collision and rooms.
//!
//! # Invariants
//! - Within a frame, orientation and velocity update strictly precede
//!   collision resolution, which precedes proximity evaluation, which
//!   precedes any room transition.
//! - A failed frame never halts the session; the last good camera state is kept.
//! - Pausing or releasing the pointer zeroes velocity and movement flags but
//!   never touches room state.

mod config;
mod event;
mod session;
mod stats;

pub use config::{DEFAULT_MAX_FRAME_DT, WalkthroughConfig};
pub use event::WalkEvent;
pub use session::{FrameError, FrameReport, Session};
pub use stats::FrameStats;

/// Crate name and version, for `info` output.
pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
