//! Transition system - moves agents through doorways they touch.

use afterhours_logic::follow::PathFollower;
use afterhours_logic::topology::RoomId;
use hecs::World;
use log::debug;

use crate::components::{Agent, Footprint, Position};
use crate::events::SimEvent;
use crate::level::Floor;

/// Relocate every agent whose footprint overlaps an exit of its room.
///
/// At most one doorway is taken per agent per tick. The landing point is
/// clamped inside the destination by half the footprint and snapped to a
/// walkable cell.
pub fn transition_system(world: &mut World, floor: &Floor, events: &mut Vec<SimEvent>) {
    for (_entity, (agent, position, footprint, follower)) in
        world.query_mut::<(&Agent, &mut Position, &Footprint, &mut PathFollower)>()
    {
        let rect = footprint.rect_at(position.pos);
        let Some(door) = floor.topology.doorway_hit(position.room, &rect).copied() else {
            continue;
        };
        let from: RoomId = position.room;
        position.room = door.to;
        position.pos = floor.landing(&door, footprint.0 / 2.0);
        follower.invalidate();

        debug!("{} moved from room {} to room {}", agent.name, from, door.to);
        events.push(SimEvent::RoomChanged {
            agent: agent.name.clone(),
            from,
            to: door.to,
        });
    }
}
