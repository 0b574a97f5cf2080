//! Capture system - resolves agent contact with the player.

use std::collections::HashMap;

use afterhours_logic::behavior::{BehaviorState, Brain};
use afterhours_logic::capture::{resolve_captures, CaptureOutcome, Contender};
use afterhours_logic::follow::PathFollower;
use afterhours_logic::signals::WorldSignals;
use hecs::{Entity, World};
use log::info;

use crate::components::{Agent, Footprint, Player, Position};
use crate::events::SimEvent;
use crate::systems::state_changed;

/// Resolve contacts for this tick. Returns `true` if the player was caught.
pub fn capture_system(
    world: &mut World,
    player: &Player,
    signals: &mut WorldSignals,
    events: &mut Vec<SimEvent>,
) -> bool {
    let before: HashMap<Entity, BehaviorState> = world
        .query_mut::<&Brain>()
        .into_iter()
        .map(|(entity, brain)| (entity, brain.state()))
        .collect();

    let outcomes = {
        let query = world.query_mut::<(&Agent, &Position, &Footprint, &mut Brain)>();
        let contenders = query
            .into_iter()
            .map(|(_, (agent, position, footprint, brain))| Contender {
                name: agent.name.as_str(),
                room: position.room,
                footprint: footprint.rect_at(position.pos),
                brain,
            });
        resolve_captures(&player.rect(), player.position.room, contenders, signals)
    };

    let mut caught = false;
    for outcome in outcomes {
        match outcome.outcome {
            CaptureOutcome::PlayerCaught(cause) => {
                info!("{} caught the player: {}", outcome.agent, cause.as_str());
                caught = true;
                events.push(SimEvent::PlayerCaught {
                    agent: outcome.agent,
                    kind: outcome.kind,
                    cause,
                });
            }
            CaptureOutcome::ResourceExchanged(cause) => {
                info!("{} exchanged with the player: {}", outcome.agent, cause.as_str());
                events.push(SimEvent::ResourceExchanged {
                    agent: outcome.agent,
                    kind: outcome.kind,
                    cause,
                });
            }
            CaptureOutcome::NoEffect => {}
        }
    }

    for (entity, (agent, brain, follower)) in
        world.query_mut::<(&Agent, &Brain, &mut PathFollower)>()
    {
        if let Some(&from) = before.get(&entity) {
            if from != brain.state() {
                state_changed(agent, from, brain.state(), follower, events);
            }
        }
    }

    caught
}
