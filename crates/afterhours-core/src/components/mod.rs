//! Component definitions for the ECS simulation.
//!
//! Components are plain data attached to agent entities. Behavior lives in
//! `afterhours_logic` and is driven by the systems.

mod common;

pub use common::*;

pub use afterhours_logic::behavior::Brain;
pub use afterhours_logic::follow::PathFollower;
