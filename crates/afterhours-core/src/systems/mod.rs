//! Systems - logic that operates on components
//!
//! Run once per tick, in this order: behavior (decide and move), transition
//! (doorways), capture (player contact).

mod behavior;
mod capture;
mod movement;
mod transition;

pub use behavior::*;
pub use capture::*;
pub use movement::*;
pub use transition::*;
