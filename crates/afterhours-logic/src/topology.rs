//! Rooms, doorways, and room-level routing.
//!
//! `Topology` holds the static floor plan: room rectangles with their
//! obstacles, and directional doorways (origin → destination, with a spawn
//! point inside the destination). Room-to-room routes are found with BFS
//! over the doorway graph; inside a room the grid pathfinder takes over.
//!
//! Validation runs once at load time and reports content bugs (dangling
//! room references, unreachable doorways) instead of guarding at runtime.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};
use crate::grid::NavGrid;

pub type RoomId = u32;

/// A room: bounds plus static obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub bounds: Rect,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub furniture: Vec<Rect>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            bounds,
            walls: Vec::new(),
            furniture: Vec::new(),
        }
    }

    /// Walls and furniture, both of which block movement.
    pub fn obstacles(&self) -> impl Iterator<Item = &Rect> {
        self.walls.iter().chain(self.furniture.iter())
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Whether a footprint overlaps any obstacle of this room.
    pub fn blocks(&self, footprint: &Rect) -> bool {
        self.obstacles().any(|o| o.overlaps(footprint))
    }
}

/// One-way opening from `from` into `to`. A two-way door is two doorways
/// sharing the same rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Doorway {
    pub rect: Rect,
    pub from: RoomId,
    pub to: RoomId,
    /// Where an agent lands inside `to`.
    pub spawn: Vec2,
}

/// Read-only view of the floor plan used by the behavior layer.
pub trait LevelView {
    fn room_ids(&self) -> Vec<RoomId>;
    fn room_center(&self, room: RoomId) -> Option<Vec2>;
    /// Rooms directly reachable through one doorway.
    fn adjacent_rooms(&self, room: RoomId) -> Vec<RoomId>;
}

/// Static floor plan: rooms plus the doorway graph.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    rooms: Vec<Room>,
    doorways: Vec<Doorway>,
    index: HashMap<RoomId, usize>,
    /// room → indices into `doorways` leaving that room
    exits: HashMap<RoomId, Vec<usize>>,
}

impl Topology {
    pub fn new(rooms: Vec<Room>, doorways: Vec<Doorway>) -> Self {
        let index = rooms.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        let mut exits: HashMap<RoomId, Vec<usize>> = HashMap::new();
        for (i, d) in doorways.iter().enumerate() {
            exits.entry(d.from).or_default().push(i);
        }
        Self {
            rooms,
            doorways,
            index,
            exits,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn doorways(&self) -> &[Doorway] {
        &self.doorways
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.index.get(&id).map(|&i| &self.rooms[i])
    }

    pub fn has_room(&self, id: RoomId) -> bool {
        self.index.contains_key(&id)
    }

    /// Doorways leaving `room`, in declaration order.
    pub fn exits(&self, room: RoomId) -> impl Iterator<Item = &Doorway> {
        self.exits
            .get(&room)
            .into_iter()
            .flatten()
            .map(|&i| &self.doorways[i])
    }

    /// First doorway out of `room` that `footprint` overlaps.
    pub fn doorway_hit(&self, room: RoomId, footprint: &Rect) -> Option<&Doorway> {
        self.exits(room).find(|d| d.rect.overlaps(footprint))
    }

    /// Shortest (fewest doorways) route from `from` to `to`.
    ///
    /// Returns an empty route for the same room and `None` if unreachable.
    pub fn route(&self, from: RoomId, to: RoomId) -> Option<Vec<Doorway>> {
        if from == to {
            return Some(vec![]);
        }
        let mut visited = HashSet::new();
        let mut parent: HashMap<RoomId, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &i in self.exits.get(&current).into_iter().flatten() {
                let next = self.doorways[i].to;
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, i);
                if next == to {
                    let mut route = Vec::new();
                    let mut room = to;
                    while let Some(&door) = parent.get(&room) {
                        route.push(self.doorways[door]);
                        room = self.doorways[door].from;
                    }
                    route.reverse();
                    return Some(route);
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// The doorway to walk toward first when heading from `from` to `to`.
    pub fn next_doorway(&self, from: RoomId, to: RoomId) -> Option<Doorway> {
        self.route(from, to)
            .and_then(|route| route.into_iter().next())
    }
}

impl LevelView for Topology {
    fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|r| r.id).collect()
    }

    fn room_center(&self, room: RoomId) -> Option<Vec2> {
        self.room(room).map(Room::center)
    }

    fn adjacent_rooms(&self, room: RoomId) -> Vec<RoomId> {
        let mut out = Vec::new();
        for d in self.exits(room) {
            if !out.contains(&d.to) {
                out.push(d.to);
            }
        }
        out
    }
}

/// A load-time validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

// ── Room geometry ───────────────────────────────────────────────────────

/// Rooms must have positive size and unique ids.
pub fn check_rooms(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for r in rooms {
        if r.bounds.w <= 0.0 || r.bounds.h <= 0.0 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room #{} '{}' has non-positive dimensions: {}×{}",
                    r.id, r.name, r.bounds.w, r.bounds.h
                ),
            });
        }
        if !seen.insert(r.id) {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!("Room id #{} is declared more than once", r.id),
            });
        }
    }
    errors
}

// ── Doorway validity ────────────────────────────────────────────────────

/// Both ends of every doorway must name existing rooms.
pub fn check_doorway_rooms_exist(topology: &Topology) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, d) in topology.doorways().iter().enumerate() {
        if !topology.has_room(d.from) {
            errors.push(ValidationError {
                category: "doorway_validity",
                severity: Severity::Error,
                message: format!("Doorway #{} references missing origin room {}", i, d.from),
            });
        }
        if !topology.has_room(d.to) {
            errors.push(ValidationError {
                category: "doorway_validity",
                severity: Severity::Error,
                message: format!("Doorway #{} references missing destination room {}", i, d.to),
            });
        }
        if d.from == d.to {
            errors.push(ValidationError {
                category: "doorway_validity",
                severity: Severity::Warning,
                message: format!("Doorway #{} loops back into room {}", i, d.from),
            });
        }
    }
    errors
}

/// Every doorway must be touchable by a footprint standing on a walkable
/// cell of its origin room, and its spawn must land inside the destination
/// on a walkable cell without re-triggering a doorway.
pub fn check_doorway_reachability(
    topology: &Topology,
    grids: &HashMap<RoomId, NavGrid>,
    footprint: f32,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, d) in topology.doorways().iter().enumerate() {
        if let Some(grid) = grids.get(&d.from) {
            let reachable = (0..grid.rows()).any(|cy| {
                (0..grid.cols()).any(|cx| {
                    grid.cell_walkable(cx, cy)
                        && Rect::centered(grid.cell_center(cx, cy), footprint).overlaps(&d.rect)
                })
            });
            if !reachable {
                errors.push(ValidationError {
                    category: "doorway_reachability",
                    severity: Severity::Error,
                    message: format!(
                        "Doorway #{} ({} → {}) cannot be reached from any walkable cell",
                        i, d.from, d.to
                    ),
                });
            }
        }

        let Some(dest) = topology.room(d.to) else {
            continue;
        };
        if !dest.bounds.contains_point(d.spawn) {
            errors.push(ValidationError {
                category: "doorway_reachability",
                severity: Severity::Error,
                message: format!(
                    "Doorway #{} spawn ({:.0},{:.0}) lies outside room '{}'",
                    i, d.spawn.x, d.spawn.y, dest.name
                ),
            });
        }
        if let Some(grid) = grids.get(&d.to) {
            if grid.snap_to_walkable(d.spawn).is_none() {
                errors.push(ValidationError {
                    category: "doorway_reachability",
                    severity: Severity::Error,
                    message: format!("Room '{}' has no walkable cell to spawn into", dest.name),
                });
            }
        }
        let landing = Rect::centered(d.spawn, footprint);
        if topology.doorway_hit(d.to, &landing).is_some() {
            errors.push(ValidationError {
                category: "doorway_reachability",
                severity: Severity::Warning,
                message: format!(
                    "Doorway #{} spawn overlaps another doorway of room '{}'",
                    i, dest.name
                ),
            });
        }
    }
    errors
}

// ── Connectivity ────────────────────────────────────────────────────────

/// Every room should have at least one way out.
pub fn check_rooms_have_exits(topology: &Topology) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if topology.rooms().len() < 2 {
        return errors;
    }
    for r in topology.rooms() {
        if topology.exits(r.id).next().is_none() {
            errors.push(ValidationError {
                category: "connectivity",
                severity: Severity::Warning,
                message: format!("Room #{} '{}' has no doorways", r.id, r.name),
            });
        }
    }
    errors
}

/// Run every check.
pub fn validate(
    topology: &Topology,
    grids: &HashMap<RoomId, NavGrid>,
    footprint: f32,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_rooms(topology.rooms()));
    all.extend(check_doorway_rooms_exist(topology));
    all.extend(check_doorway_reachability(topology, grids, footprint));
    all.extend(check_rooms_have_exits(topology));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door(from: RoomId, to: RoomId, x: f32, spawn_x: f32) -> Doorway {
        Doorway {
            rect: Rect::new(x - 5.0, 100.0, 10.0, 100.0),
            from,
            to,
            spawn: Vec2::new(spawn_x, 150.0),
        }
    }

    /// A(0..400) <-> B(400..800) <-> C(800..1200)
    fn linear() -> Topology {
        let rooms = vec![
            Room::new(1, "A", Rect::new(0.0, 0.0, 400.0, 300.0)),
            Room::new(2, "B", Rect::new(400.0, 0.0, 400.0, 300.0)),
            Room::new(3, "C", Rect::new(800.0, 0.0, 400.0, 300.0)),
        ];
        let doorways = vec![
            door(1, 2, 400.0, 450.0),
            door(2, 1, 400.0, 350.0),
            door(2, 3, 800.0, 850.0),
            door(3, 2, 800.0, 750.0),
        ];
        Topology::new(rooms, doorways)
    }

    fn grids(t: &Topology) -> HashMap<RoomId, NavGrid> {
        t.rooms()
            .iter()
            .map(|r| (r.id, NavGrid::from_room(r, 20.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_same_room_route_empty() {
        assert_eq!(linear().route(2, 2), Some(vec![]));
    }

    #[test]
    fn test_multi_hop_route() {
        let t = linear();
        let route = t.route(3, 1).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!((route[0].from, route[0].to), (3, 2));
        assert_eq!((route[1].from, route[1].to), (2, 1));
        assert_eq!(t.next_doorway(3, 1).map(|d| d.to), Some(2));
    }

    #[test]
    fn test_one_way_doorway_is_directional() {
        let rooms = vec![
            Room::new(1, "A", Rect::new(0.0, 0.0, 400.0, 300.0)),
            Room::new(2, "B", Rect::new(400.0, 0.0, 400.0, 300.0)),
        ];
        let t = Topology::new(rooms, vec![door(1, 2, 400.0, 450.0)]);
        assert!(t.route(1, 2).is_some());
        assert_eq!(t.route(2, 1), None);
    }

    #[test]
    fn test_unknown_room_unreachable() {
        assert_eq!(linear().route(1, 99), None);
    }

    #[test]
    fn test_doorway_hit_only_from_origin_room() {
        let t = linear();
        let at_door = Rect::centered(Vec2::new(400.0, 150.0), 38.0);
        assert_eq!(t.doorway_hit(1, &at_door).map(|d| d.to), Some(2));
        assert_eq!(t.doorway_hit(2, &at_door).map(|d| d.to), Some(1));
        assert!(t.doorway_hit(3, &at_door).is_none());
        let away = Rect::centered(Vec2::new(200.0, 150.0), 38.0);
        assert!(t.doorway_hit(1, &away).is_none());
    }

    #[test]
    fn test_level_view() {
        let t = linear();
        assert_eq!(t.adjacent_rooms(2), vec![1, 3]);
        assert_eq!(t.room_center(3), Some(Vec2::new(1000.0, 150.0)));
        assert_eq!(t.room_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_valid_layout_has_no_errors() {
        let t = linear();
        let errors = validate(&t, &grids(&t), 38.0);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_missing_room_reported() {
        let rooms = vec![Room::new(1, "A", Rect::new(0.0, 0.0, 400.0, 300.0))];
        let t = Topology::new(rooms, vec![door(1, 7, 400.0, 450.0)]);
        let errors = check_doorway_rooms_exist(&t);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Error);
        assert!(errors[0].message.contains("destination room 7"));
    }

    #[test]
    fn test_spawn_outside_destination_reported() {
        let rooms = vec![
            Room::new(1, "A", Rect::new(0.0, 0.0, 400.0, 300.0)),
            Room::new(2, "B", Rect::new(400.0, 0.0, 400.0, 300.0)),
        ];
        let t = Topology::new(
            rooms,
            vec![door(1, 2, 400.0, 350.0), door(2, 1, 400.0, 350.0)],
        );
        let errors = check_doorway_reachability(&t, &grids(&t), 38.0);
        assert!(errors
            .iter()
            .any(|e| e.message.contains("lies outside room 'B'")));
    }

    #[test]
    fn test_walled_off_doorway_reported() {
        let mut a = Room::new(1, "A", Rect::new(0.0, 0.0, 400.0, 300.0));
        a.walls.push(Rect::new(300.0, 0.0, 100.0, 300.0));
        let rooms = vec![a, Room::new(2, "B", Rect::new(400.0, 0.0, 400.0, 300.0))];
        let t = Topology::new(
            rooms,
            vec![door(1, 2, 400.0, 450.0), door(2, 1, 400.0, 350.0)],
        );
        let errors = check_doorway_reachability(&t, &grids(&t), 38.0);
        assert!(errors
            .iter()
            .any(|e| e.message.contains("cannot be reached")));
    }
}
