//! Level descriptions and floor-plan construction.
//!
//! A [`LevelSpec`] lists rooms, the doors between them, and where each agent
//! starts. Walls are generated: every room gets a wall of `wall_thickness`
//! along each side, with a gap wherever a door touches that side.
//!
//! Two built-in levels are provided:
//! - [`LevelSpec::office`]: the five-room night-shift office.
//! - [`LevelSpec::linear`]: `n` equal rooms in a row, each connected to the next.

use std::collections::HashMap;

use afterhours_logic::behavior::{AgentKind, Place};
use afterhours_logic::direct::DirectParams;
use afterhours_logic::follow::RoomNav;
use afterhours_logic::geometry::{Rect, Vec2};
use afterhours_logic::grid::NavGrid;
use afterhours_logic::topology::{Doorway, Room, RoomId, Topology};
use serde::{Deserialize, Serialize};

use crate::config::NavConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: RoomId,
    pub name: String,
    pub bounds: Rect,
    #[serde(default)]
    pub furniture: Vec<Rect>,
}

/// An opening between two rooms. Two-way unless `one_way` is set, in which
/// case it only leads from `a` to `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub rect: Rect,
    pub a: RoomId,
    pub b: RoomId,
    #[serde(default)]
    pub one_way: bool,
    /// Landing point in `a` when entering from `b`; derived when omitted.
    #[serde(default)]
    pub a_spawn: Option<Vec2>,
    /// Landing point in `b` when entering from `a`; derived when omitted.
    #[serde(default)]
    pub b_spawn: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub kind: AgentKind,
    pub room: RoomId,
    pub pos: Vec2,
    /// Guardian patrol loop, in its start room.
    #[serde(default)]
    pub patrol: Vec<Vec2>,
    /// Guardian and monitor desk; defaults to the start position.
    #[serde(default)]
    pub desk: Option<Vec2>,
    /// Scavenger raid target.
    #[serde(default)]
    pub stash: Option<Place>,
}

fn default_stock() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub doors: Vec<DoorSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    pub player: Place,
    #[serde(default = "default_stock")]
    pub stock: u32,
    #[serde(default)]
    pub player_has_item: bool,
}

/// Side of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which side of `room` a door rectangle sits on: the edge nearest the
/// door's center.
pub fn door_side(door: &Rect, room: &Rect) -> Side {
    let c = door.center();
    let d = [
        ((c.x - room.left()).abs(), Side::Left),
        ((c.x - room.right()).abs(), Side::Right),
        ((c.y - room.top()).abs(), Side::Top),
        ((c.y - room.bottom()).abs(), Side::Bottom),
    ];
    let mut best = d[0];
    for candidate in &d[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}

/// Split `[lo, hi)` around the given gaps.
fn segments(lo: f32, hi: f32, gaps: &mut [(f32, f32)]) -> Vec<(f32, f32)> {
    gaps.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut out = Vec::new();
    let mut cursor = lo;
    for &(g0, g1) in gaps.iter() {
        let (g0, g1) = (g0.max(lo), g1.min(hi));
        if g0 > cursor {
            out.push((cursor, g0));
        }
        cursor = cursor.max(g1);
    }
    if cursor < hi {
        out.push((cursor, hi));
    }
    out
}

/// Perimeter walls for `bounds`, leaving a gap for each door on each side.
pub fn build_walls(bounds: &Rect, doors: &[Rect], thickness: f32) -> Vec<Rect> {
    let mut walls = Vec::new();
    for side in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
        let mut gaps: Vec<(f32, f32)> = doors
            .iter()
            .filter(|d| door_side(d, bounds) == side)
            .map(|d| match side {
                Side::Top | Side::Bottom => (d.left(), d.right()),
                Side::Left | Side::Right => (d.top(), d.bottom()),
            })
            .collect();
        match side {
            Side::Top | Side::Bottom => {
                let y = if side == Side::Top {
                    bounds.top()
                } else {
                    bounds.bottom() - thickness
                };
                for (x0, x1) in segments(bounds.left(), bounds.right(), &mut gaps) {
                    walls.push(Rect::new(x0, y, x1 - x0, thickness));
                }
            }
            Side::Left | Side::Right => {
                let x = if side == Side::Left {
                    bounds.left()
                } else {
                    bounds.right() - thickness
                };
                for (y0, y1) in segments(bounds.top(), bounds.bottom(), &mut gaps) {
                    walls.push(Rect::new(x, y0, thickness, y1 - y0));
                }
            }
        }
    }
    walls
}

/// Landing point just inside `room` past the door's wall gap.
fn derived_spawn(door: &Rect, room: &Rect, nav: &NavConfig) -> Vec2 {
    let inset = nav.wall_thickness + nav.agent_size / 2.0 + nav.cell_size;
    let c = door.center();
    match door_side(door, room) {
        Side::Left => Vec2::new(room.left() + inset, c.y),
        Side::Right => Vec2::new(room.right() - inset, c.y),
        Side::Top => Vec2::new(c.x, room.top() + inset),
        Side::Bottom => Vec2::new(c.x, room.bottom() - inset),
    }
}

impl LevelSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn room_bounds(&self, id: RoomId) -> Option<Rect> {
        self.rooms.iter().find(|r| r.id == id).map(|r| r.bounds)
    }

    /// Build rooms (with generated walls) and directional doorways.
    ///
    /// Doors naming unknown rooms are kept so that validation can report
    /// them.
    pub fn build_topology(&self, nav: &NavConfig) -> Topology {
        let rooms = self
            .rooms
            .iter()
            .map(|spec| {
                let door_rects: Vec<Rect> = self
                    .doors
                    .iter()
                    .filter(|d| d.a == spec.id || d.b == spec.id)
                    .map(|d| d.rect)
                    .collect();
                let mut room = Room::new(spec.id, spec.name.clone(), spec.bounds);
                room.walls = build_walls(&spec.bounds, &door_rects, nav.wall_thickness);
                room.furniture = spec.furniture.clone();
                room
            })
            .collect();

        let mut doorways = Vec::new();
        for d in &self.doors {
            let spawn_in = |room: RoomId, explicit: Option<Vec2>| {
                explicit
                    .or_else(|| {
                        self.room_bounds(room)
                            .map(|b| derived_spawn(&d.rect, &b, nav))
                    })
                    .unwrap_or_else(|| d.rect.center())
            };
            doorways.push(Doorway {
                rect: d.rect,
                from: d.a,
                to: d.b,
                spawn: spawn_in(d.b, d.b_spawn),
            });
            if !d.one_way {
                doorways.push(Doorway {
                    rect: d.rect,
                    from: d.b,
                    to: d.a,
                    spawn: spawn_in(d.a, d.a_spawn),
                });
            }
        }
        Topology::new(rooms, doorways)
    }

    /// The night-shift office: break room, office, hallway, classroom and
    /// meeting room, with one agent of each kind.
    ///
    /// ```text
    /// Break Room | Office | Hallway | Classroom
    ///                      | Meeting |
    /// ```
    pub fn office() -> Self {
        const BREAK_ROOM: RoomId = 1;
        const OFFICE: RoomId = 2;
        const HALLWAY: RoomId = 3;
        const CLASSROOM: RoomId = 4;
        const MEETING: RoomId = 5;

        let room = |id, name: &str, bounds, furniture| RoomSpec {
            id,
            name: name.to_string(),
            bounds,
            furniture,
        };
        let door = |rect, a, b| DoorSpec {
            rect,
            a,
            b,
            one_way: false,
            a_spawn: None,
            b_spawn: None,
        };
        let agent = |name: &str, kind, room, pos| AgentSpec {
            name: name.to_string(),
            kind,
            room,
            pos,
            patrol: vec![],
            desk: None,
            stash: None,
        };

        Self {
            name: "office".to_string(),
            rooms: vec![
                room(
                    BREAK_ROOM,
                    "Break Room",
                    Rect::new(-100.0, 100.0, 200.0, 400.0),
                    vec![Rect::new(-80.0, 120.0, 40.0, 60.0)],
                ),
                room(
                    OFFICE,
                    "Office",
                    Rect::new(100.0, 100.0, 450.0, 400.0),
                    vec![
                        Rect::new(300.0, 160.0, 80.0, 40.0),
                        Rect::new(300.0, 400.0, 80.0, 40.0),
                    ],
                ),
                room(HALLWAY, "Hallway", Rect::new(550.0, 100.0, 550.0, 400.0), vec![]),
                room(
                    CLASSROOM,
                    "Classroom",
                    Rect::new(1100.0, 100.0, 450.0, 400.0),
                    vec![
                        Rect::new(1200.0, 200.0, 60.0, 30.0),
                        Rect::new(1340.0, 200.0, 60.0, 30.0),
                        Rect::new(1200.0, 320.0, 60.0, 30.0),
                    ],
                ),
                room(
                    MEETING,
                    "Meeting Room",
                    Rect::new(550.0, 500.0, 550.0, 250.0),
                    vec![Rect::new(650.0, 650.0, 200.0, 40.0)],
                ),
            ],
            doors: vec![
                door(Rect::new(95.0, 250.0, 10.0, 100.0), BREAK_ROOM, OFFICE),
                door(Rect::new(545.0, 250.0, 10.0, 100.0), OFFICE, HALLWAY),
                door(Rect::new(1095.0, 250.0, 10.0, 100.0), HALLWAY, CLASSROOM),
                door(Rect::new(750.0, 495.0, 150.0, 10.0), HALLWAY, MEETING),
            ],
            agents: vec![
                agent("Jo-nathan", AgentKind::Pursuer, CLASSROOM, Vec2::new(1300.0, 300.0)),
                AgentSpec {
                    patrol: vec![
                        Vec2::new(200.0, 250.0),
                        Vec2::new(460.0, 250.0),
                        Vec2::new(460.0, 350.0),
                        Vec2::new(200.0, 350.0),
                    ],
                    desk: Some(Vec2::new(220.0, 210.0)),
                    ..agent("Jeromathy", AgentKind::Guardian, OFFICE, Vec2::new(250.0, 250.0))
                },
                AgentSpec {
                    desk: Some(Vec2::new(840.0, 230.0)),
                    ..agent("Angellica", AgentKind::Monitor, HALLWAY, Vec2::new(850.0, 250.0))
                },
                AgentSpec {
                    stash: Some(Place::new(BREAK_ROOM, Vec2::new(0.0, 300.0))),
                    ..agent("NextGen Intern", AgentKind::Scavenger, CLASSROOM, Vec2::new(1200.0, 420.0))
                },
                agent("Runnit", AgentKind::Sprinter, MEETING, Vec2::new(825.0, 590.0)),
            ],
            player: Place::new(OFFICE, Vec2::new(325.0, 300.0)),
            stock: 5,
            player_has_item: false,
        }
    }

    /// `n` rooms of 400×300 laid out left to right, ids `1..=n`, each joined
    /// to the next by a 100-unit door in the middle of the shared wall.
    /// No agents; the player stands in the first room.
    pub fn linear(n: usize) -> Self {
        const W: f32 = 400.0;
        const H: f32 = 300.0;
        let rooms = (0..n)
            .map(|i| RoomSpec {
                id: i as RoomId + 1,
                name: format!("Room {}", i + 1),
                bounds: Rect::new(i as f32 * W, 0.0, W, H),
                furniture: vec![],
            })
            .collect();
        let doors = (1..n)
            .map(|i| DoorSpec {
                rect: Rect::new(i as f32 * W - 5.0, 100.0, 10.0, 100.0),
                a: i as RoomId,
                b: i as RoomId + 1,
                one_way: false,
                a_spawn: None,
                b_spawn: None,
            })
            .collect();
        Self {
            name: format!("linear-{}", n),
            rooms,
            doors,
            agents: vec![],
            player: Place::new(1, Vec2::new(W / 2.0, H / 2.0)),
            stock: default_stock(),
            player_has_item: false,
        }
    }

    /// Add an agent with no patrol, desk or stash.
    pub fn with_agent(mut self, name: &str, kind: AgentKind, at: Place) -> Self {
        self.agents.push(AgentSpec {
            name: name.to_string(),
            kind,
            room: at.room,
            pos: at.pos,
            patrol: vec![],
            desk: None,
            stash: None,
        });
        self
    }
}

/// Built floor plan: topology plus per-room navigation data.
#[derive(Debug, Clone)]
pub struct Floor {
    pub topology: Topology,
    navs: HashMap<RoomId, RoomNav>,
}

impl Floor {
    pub fn build(spec: &LevelSpec, nav: &NavConfig, direct: DirectParams) -> Self {
        let topology = spec.build_topology(nav);
        let navs = topology
            .rooms()
            .iter()
            .map(|room| {
                (
                    room.id,
                    RoomNav::new(room, nav.cell_size, nav.clearance(), direct),
                )
            })
            .collect();
        Self { topology, navs }
    }

    pub fn nav(&self, room: RoomId) -> Option<&RoomNav> {
        self.navs.get(&room)
    }

    pub fn room(&self, room: RoomId) -> Option<&Room> {
        self.topology.room(room)
    }

    /// Grids keyed by room, for validation.
    pub fn grids(&self) -> HashMap<RoomId, NavGrid> {
        self.navs
            .iter()
            .map(|(&id, nav)| (id, nav.grid.clone()))
            .collect()
    }

    /// Where an entity of half-size `half` lands when taking `door`: the
    /// spawn point clamped inside the destination, then snapped onto a
    /// walkable cell.
    pub fn landing(&self, door: &Doorway, half: f32) -> Vec2 {
        let clamped = self
            .room(door.to)
            .map_or(door.spawn, |r| r.bounds.clamp_point(door.spawn, half));
        self.nav(door.to)
            .and_then(|nav| nav.grid.snap_to_walkable(clamped))
            .unwrap_or(clamped)
    }

    /// Nearest walkable point in `room`, or `p` itself if the room has none.
    pub fn snap(&self, room: RoomId, p: Vec2) -> Vec2 {
        self.nav(room)
            .and_then(|nav| nav.grid.snap_to_walkable(p))
            .unwrap_or(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_clamped_and_walkable() {
        let nav = NavConfig::default();
        let floor = Floor::build(&LevelSpec::linear(2), &nav, DirectParams::default());
        let door = *floor.topology.exits(1).next().unwrap();
        let landing = floor.landing(&door, nav.agent_size / 2.0);
        let grid = &floor.nav(2).unwrap().grid;
        assert!(grid.is_walkable(landing.x, landing.y));
        assert!(floor.topology.doorway_hit(2, &Rect::centered(landing, nav.agent_size)).is_none());

        // A spawn outside the destination is pulled back inside
        let stray = Doorway {
            spawn: Vec2::new(2000.0, 150.0),
            ..door
        };
        let p = floor.landing(&stray, nav.agent_size / 2.0);
        assert!(p.x < 800.0 && p.x > 400.0);
    }

    #[test]
    fn test_office_floor_validates() {
        let nav = NavConfig::default();
        let floor = Floor::build(&LevelSpec::office(), &nav, DirectParams::default());
        let errors: Vec<_> = afterhours_logic::topology::validate(&floor.topology, &floor.grids(), nav.agent_size)
            .into_iter()
            .filter(|e| e.severity == afterhours_logic::topology::Severity::Error)
            .collect();
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_door_side_nearest_edge() {
        let room = Rect::new(100.0, 100.0, 450.0, 400.0);
        assert_eq!(door_side(&Rect::new(95.0, 250.0, 10.0, 100.0), &room), Side::Left);
        assert_eq!(door_side(&Rect::new(545.0, 250.0, 10.0, 100.0), &room), Side::Right);
        let hall = Rect::new(550.0, 100.0, 550.0, 400.0);
        assert_eq!(door_side(&Rect::new(750.0, 495.0, 150.0, 10.0), &hall), Side::Bottom);
    }

    #[test]
    fn test_walls_leave_door_gap() {
        let room = Rect::new(0.0, 0.0, 400.0, 300.0);
        let walls = build_walls(&room, &[Rect::new(395.0, 100.0, 10.0, 100.0)], 20.0);
        // top, bottom, left, and the right side split in two
        assert_eq!(walls.len(), 5);
        assert!(walls.contains(&Rect::new(380.0, 0.0, 20.0, 100.0)));
        assert!(walls.contains(&Rect::new(380.0, 200.0, 20.0, 100.0)));
        let in_gap = Rect::centered(Vec2::new(390.0, 150.0), 38.0);
        assert!(!walls.iter().any(|w| w.overlaps(&in_gap)));
    }

    #[test]
    fn test_segments_merge_overlapping_gaps() {
        let mut gaps = vec![(50.0, 80.0), (10.0, 30.0), (70.0, 90.0)];
        assert_eq!(
            segments(0.0, 100.0, &mut gaps),
            vec![(0.0, 10.0), (30.0, 50.0), (90.0, 100.0)]
        );
    }

    #[test]
    fn test_linear_topology() {
        let level = LevelSpec::linear(3);
        let topology = level.build_topology(&NavConfig::default());
        assert_eq!(topology.rooms().len(), 3);
        assert_eq!(topology.doorways().len(), 4);
        let route = topology.route(3, 1).unwrap();
        assert_eq!(route.len(), 2);
        // Entering room 2 from room 1 lands left of center, past the wall
        let into_b = topology.exits(1).next().unwrap();
        assert_eq!(into_b.spawn, Vec2::new(459.0, 150.0));
    }

    #[test]
    fn test_one_way_door() {
        let mut level = LevelSpec::linear(2);
        level.doors[0].one_way = true;
        let topology = level.build_topology(&NavConfig::default());
        assert!(topology.route(1, 2).is_some());
        assert!(topology.route(2, 1).is_none());
    }

    #[test]
    fn test_office_json_round_trip() {
        let level = LevelSpec::office();
        let json = level.to_json_string().unwrap();
        assert_eq!(LevelSpec::from_json_str(&json).unwrap(), level);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let level = LevelSpec::from_json_str(
            r#"{
                "name": "tiny",
                "rooms": [{ "id": 1, "name": "A", "bounds": { "x": 0, "y": 0, "w": 200, "h": 200 } }],
                "player": { "room": 1, "pos": { "x": 100, "y": 100 } }
            }"#,
        )
        .unwrap();
        assert_eq!(level.stock, 3);
        assert!(level.doors.is_empty());
        assert!(!level.player_has_item);
    }
}
