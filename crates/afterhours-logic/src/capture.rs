//! Player/agent overlap resolution.
//!
//! Runs once per frame after every agent has moved. What an overlap means
//! is decided by the agent's own [`Brain::on_collide_with_player`]; this
//! module only finds the overlaps and collects outcomes.

use serde::{Deserialize, Serialize};

use crate::behavior::{AgentKind, Brain};
use crate::geometry::Rect;
use crate::signals::WorldSignals;
use crate::topology::RoomId;

/// Coarse reason attached to a capture or exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cause {
    /// Pursuer reached a player without the item.
    NoItemOffered,
    /// Guardian caught the player after the stock ran out.
    ResourceDepleted,
    /// Monitor caught an idle player.
    CaughtSlacking,
    /// Sprinter hit the player mid-dash.
    RanOver,
    /// Pursuer accepted the item instead of catching.
    ItemTaken,
    /// Scavenger took one unit of stock.
    StockTaken,
}

impl Cause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::NoItemOffered => "no item offered",
            Cause::ResourceDepleted => "resource depleted",
            Cause::CaughtSlacking => "caught slacking",
            Cause::RanOver => "ran over",
            Cause::ItemTaken => "item taken",
            Cause::StockTaken => "stock taken",
        }
    }
}

/// What a single overlap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    NoEffect,
    ResourceExchanged(Cause),
    PlayerCaught(Cause),
}

/// An overlap that had an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub agent: String,
    pub kind: AgentKind,
    pub outcome: CaptureOutcome,
}

/// One agent as seen by the resolver.
pub struct Contender<'a> {
    pub name: &'a str,
    pub room: RoomId,
    pub footprint: Rect,
    pub brain: &'a mut Brain,
}

/// Resolve every agent overlapping the player.
///
/// Only agents in the player's room can collide. Resolution stops at the
/// first [`CaptureOutcome::PlayerCaught`]; exchanges before it are kept.
pub fn resolve_captures<'a>(
    player: &Rect,
    player_room: RoomId,
    contenders: impl IntoIterator<Item = Contender<'a>>,
    signals: &mut WorldSignals,
) -> Vec<CaptureEvent> {
    let mut events = Vec::new();
    for c in contenders {
        if c.room != player_room || !c.footprint.overlaps(player) {
            continue;
        }
        let outcome = c.brain.on_collide_with_player(signals);
        if outcome == CaptureOutcome::NoEffect {
            continue;
        }
        events.push(CaptureEvent {
            agent: c.name.to_string(),
            kind: c.brain.kind(),
            outcome,
        });
        if matches!(outcome, CaptureOutcome::PlayerCaught(_)) {
            break;
        }
    }
    events
}
