//! Discrete notifications raised during an update.

use afterhours_logic::behavior::{AgentKind, BehaviorState};
use afterhours_logic::capture::Cause;
use afterhours_logic::topology::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Game over. Raised at most once per simulation.
    PlayerCaught {
        agent: String,
        kind: AgentKind,
        cause: Cause,
    },
    /// A non-lethal exchange consumed the player's item or stock.
    ResourceExchanged {
        agent: String,
        kind: AgentKind,
        cause: Cause,
    },
    RoomChanged {
        agent: String,
        from: RoomId,
        to: RoomId,
    },
    StateChanged {
        agent: String,
        from: BehaviorState,
        to: BehaviorState,
    },
}

impl SimEvent {
    pub fn is_capture(&self) -> bool {
        matches!(self, SimEvent::PlayerCaught { .. })
    }
}
