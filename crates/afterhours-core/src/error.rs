//! Errors raised while loading a level.
//!
//! Loading is the only fallible surface of the simulation. Once a
//! [`crate::engine::Simulation`] exists, every runtime problem degrades
//! locally instead of failing.

use afterhours_logic::topology::RoomId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("agent '{agent}' references unknown room {room}")]
    UnknownAgentRoom { agent: String, room: RoomId },

    #[error("player starts in unknown room {0}")]
    UnknownPlayerRoom(RoomId),

    #[error("agent '{agent}' is missing its {field}")]
    MissingField { agent: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, LevelError>;
