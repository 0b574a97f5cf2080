//! Collision response against room obstacles.

use afterhours_logic::geometry::Vec2;
use afterhours_logic::topology::Room;

use crate::components::Footprint;

/// Resolve a proposed move from `from` to `to` inside `room`.
///
/// Tries the full move, then the horizontal and vertical components alone,
/// and otherwise stays put. An entity already overlapping an obstacle may
/// move freely so it can work itself loose.
pub fn slide_move(room: &Room, footprint: Footprint, from: Vec2, to: Vec2) -> Vec2 {
    let blocked = |p: Vec2| room.blocks(&footprint.rect_at(p));
    if !blocked(to) || blocked(from) {
        return to;
    }
    let x_only = Vec2::new(to.x, from.y);
    if !blocked(x_only) {
        return x_only;
    }
    let y_only = Vec2::new(from.x, to.y);
    if !blocked(y_only) {
        return y_only;
    }
    from
}
