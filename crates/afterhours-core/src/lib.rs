//! Afterhours Core - pursuit simulation engine
//!
//! An ECS-based simulation of a small office after hours: antagonist agents
//! patrol, chase, raid and dash through a set of rooms while the host game
//! moves the player.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Antagonist agents
//! - **Components**: Pure data attached to entities (Agent, Position, Brain, PathFollower)
//! - **Systems**: Free functions that query and update components each tick
//!
//! Navigation and decision logic live in `afterhours-logic`; this crate owns
//! the world, the frame order and the level format.
//!
//! # Example
//!
//! ```rust,no_run
//! use afterhours_core::prelude::*;
//!
//! let mut sim = Simulation::from_level(&LevelSpec::office(), SimConfig::default()).unwrap();
//!
//! while sim.status() == SimStatus::Running {
//!     sim.update(1.0 / 60.0);
//!     for event in sim.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod level;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::engine::{AgentSnapshot, SimStatus, Simulation};
    pub use crate::error::LevelError;
    pub use crate::events::SimEvent;
    pub use crate::level::{Floor, LevelSpec};
    pub use afterhours_logic::behavior::{AgentKind, BehaviorState, Place};
    pub use afterhours_logic::geometry::{Facing, Rect, Vec2};
}
