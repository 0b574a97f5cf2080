//! Components shared by every agent, plus the player record.

use afterhours_logic::behavior::AgentKind;
use afterhours_logic::geometry::{Facing, Rect, Vec2};
use afterhours_logic::topology::RoomId;
use serde::{Deserialize, Serialize};

/// Identity of an antagonist agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub kind: AgentKind,
}

/// Where an entity is: world position (center), room, and facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub pos: Vec2,
    pub room: RoomId,
    pub facing: Facing,
}

impl Position {
    pub fn new(room: RoomId, pos: Vec2) -> Self {
        Self {
            pos,
            room,
            facing: Facing::default(),
        }
    }

    /// Face along `direction`; a zero direction keeps the current facing.
    pub fn face(&mut self, direction: Vec2) {
        if let Some(f) = Facing::from_direction(direction) {
            self.facing = f;
        }
    }
}

/// Collision square side length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint(pub f32);

impl Footprint {
    pub fn rect_at(&self, center: Vec2) -> Rect {
        Rect::centered(center, self.0)
    }
}

/// The player as the core sees it. Moved only through
/// [`crate::engine::Simulation::set_player_position`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub footprint: Footprint,
}

impl Player {
    pub fn rect(&self) -> Rect {
        self.footprint.rect_at(self.position.pos)
    }
}
