//! Behavior system - runs every brain, then steers its entity toward the
//! chosen goal.

use afterhours_logic::behavior::{BehaviorState, Brain, Goal, ThinkContext};
use afterhours_logic::capture::Cause;
use afterhours_logic::follow::{FollowParams, PathFollower};
use afterhours_logic::geometry::Vec2;
use afterhours_logic::signals::WorldSignals;
use hecs::World;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;

use crate::components::{Agent, Footprint, Player, Position};
use crate::events::SimEvent;
use crate::level::Floor;
use crate::systems::slide_move;

/// Think and move every agent for one tick.
#[allow(clippy::too_many_arguments)]
pub fn behavior_system(
    world: &mut World,
    floor: &Floor,
    player: &Player,
    signals: &mut WorldSignals,
    follow: &FollowParams,
    rng: &mut StdRng,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    for (_entity, (agent, position, footprint, brain, follower)) in world.query_mut::<(
        &Agent,
        &mut Position,
        &Footprint,
        &mut Brain,
        &mut PathFollower,
    )>() {
        let before = brain.state();
        let decision = {
            let mut ctx = ThinkContext {
                dt,
                pos: position.pos,
                room: position.room,
                signals: &mut *signals,
                level: &floor.topology,
                rng: &mut *rng,
            };
            brain.think(&mut ctx)
        };

        if brain.state() != before {
            state_changed(agent, before, brain.state(), follower, events);
        }
        if decision.took_stock {
            info!("{} took a snack, {} left", agent.name, signals.stock);
            events.push(SimEvent::ResourceExchanged {
                agent: agent.name.clone(),
                kind: agent.kind,
                cause: Cause::StockTaken,
            });
        }

        let Some(target) = goal_target(floor, agent, position, &decision.goal, player) else {
            continue;
        };
        let (Some(nav), Some(room)) = (floor.nav(position.room), floor.room(position.room)) else {
            warn!("{} is in unknown room {}", agent.name, position.room);
            continue;
        };

        let step = follower.step(nav, position.pos, target, decision.speed, dt, follow, &mut *rng);
        if step.fell_back {
            trace!("{}: no grid path in room {}, steering directly", agent.name, position.room);
        }
        position.face(step.direction);
        position.pos = slide_move(room, *footprint, position.pos, step.pos);
    }
}

/// Bookkeeping for a state transition: drop the stale path and report it.
pub fn state_changed(
    agent: &Agent,
    from: BehaviorState,
    to: BehaviorState,
    follower: &mut PathFollower,
    events: &mut Vec<SimEvent>,
) {
    follower.invalidate();
    debug!("{} ({}): {} -> {}", agent.name, agent.kind.as_str(), from.name(), to.name());
    events.push(SimEvent::StateChanged {
        agent: agent.name.clone(),
        from,
        to,
    });
}

/// Point to steer toward this tick, within the agent's current room.
///
/// A goal in another room becomes the first doorway on the route there.
fn goal_target(
    floor: &Floor,
    agent: &Agent,
    at: &Position,
    goal: &Goal,
    player: &Player,
) -> Option<Vec2> {
    let (room, pos) = match goal {
        Goal::Hold => return None,
        Goal::Player => (player.position.room, player.position.pos),
        Goal::Place(place) => (place.room, place.pos),
    };
    if room == at.room {
        return Some(pos);
    }
    match floor.topology.next_doorway(at.room, room) {
        Some(door) => Some(door.rect.center()),
        None => {
            warn!("{}: no route from room {} to room {}", agent.name, at.room, room);
            None
        }
    }
}
