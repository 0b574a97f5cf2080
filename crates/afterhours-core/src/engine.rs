//! Simulation engine - main entry point for running the simulation

use afterhours_logic::behavior::{AgentKind, Brain, Place};
use afterhours_logic::follow::PathFollower;
use afterhours_logic::geometry::{Facing, Vec2};
use afterhours_logic::signals::WorldSignals;
use afterhours_logic::topology::{self, RoomId, Severity};
use hecs::World;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::components::*;
use crate::config::SimConfig;
use crate::error::{LevelError, Result};
use crate::events::SimEvent;
use crate::level::{AgentSpec, Floor, LevelSpec};
use crate::systems::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimStatus {
    Running,
    /// Terminal. Further updates do nothing.
    Caught,
}

/// Read-only view of one agent, for rendering and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub name: String,
    pub kind: AgentKind,
    pub room: RoomId,
    pub position: Vec2,
    pub facing: Facing,
    pub state: &'static str,
}

/// Main simulation engine
pub struct Simulation {
    /// ECS world containing one entity per agent
    pub world: World,
    floor: Floor,
    config: SimConfig,
    player: Player,
    signals: WorldSignals,
    rng: StdRng,
    events: Vec<SimEvent>,
    status: SimStatus,
    /// Seconds since start
    sim_time: f64,
    tick: u64,
}

impl Simulation {
    /// Build a simulation from a level description.
    ///
    /// Fails if the level does not validate, or if an agent or the player
    /// starts somewhere that does not exist.
    pub fn from_level(spec: &LevelSpec, config: SimConfig) -> Result<Self> {
        let floor = Floor::build(spec, &config.nav, config.direct);

        let findings = topology::validate(&floor.topology, &floor.grids(), config.nav.agent_size);
        let mut errors = Vec::new();
        for finding in findings {
            match finding.severity {
                Severity::Error => errors.push(format!("[{}] {}", finding.category, finding.message)),
                Severity::Warning => warn!("[{}] {}", finding.category, finding.message),
            }
        }
        if !errors.is_empty() {
            return Err(LevelError::Invalid(errors));
        }

        if !floor.topology.has_room(spec.player.room) {
            return Err(LevelError::UnknownPlayerRoom(spec.player.room));
        }

        let mut world = World::new();
        for agent in &spec.agents {
            spawn_agent(&mut world, &floor, &config, agent)?;
        }

        let player = Player {
            position: Position::new(spec.player.room, spec.player.pos),
            footprint: Footprint(config.nav.player_size),
        };
        let signals = WorldSignals {
            stock: spec.stock,
            player_has_item: spec.player_has_item,
            productive: false,
            idle: config.idle.meter(),
        };

        info!(
            "loaded level '{}': {} rooms, {} doorways, {} agents",
            spec.name,
            floor.topology.rooms().len(),
            floor.topology.doorways().len(),
            spec.agents.len()
        );

        Ok(Self {
            world,
            floor,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            player,
            signals,
            events: Vec::new(),
            status: SimStatus::Running,
            sim_time: 0.0,
            tick: 0,
        })
    }

    /// Parse a JSON level and build a simulation from it.
    pub fn from_json(level: &str, config: SimConfig) -> Result<Self> {
        Self::from_level(&LevelSpec::from_json_str(level)?, config)
    }

    /// Update the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.status == SimStatus::Caught {
            return;
        }

        self.signals.tick(dt);

        behavior_system(
            &mut self.world,
            &self.floor,
            &self.player,
            &mut self.signals,
            &self.config.follow,
            &mut self.rng,
            dt,
            &mut self.events,
        );

        transition_system(&mut self.world, &self.floor, &mut self.events);

        if capture_system(&mut self.world, &self.player, &mut self.signals, &mut self.events) {
            self.status = SimStatus::Caught;
        }

        self.sim_time += dt as f64;
        self.tick += 1;
    }

    /// Move the player. The room changes when the player's footprint
    /// touches an exit and its center has crossed into the destination.
    pub fn set_player_position(&mut self, pos: Vec2) {
        let position = &mut self.player.position;
        position.face(pos - position.pos);
        position.pos = pos;

        let rect = self.player.footprint.rect_at(pos);
        let crossed = self
            .floor
            .topology
            .exits(position.room)
            .filter(|d| d.rect.overlaps(&rect))
            .find(|d| {
                self.floor
                    .room(d.to)
                    .is_some_and(|room| room.bounds.contains_point(pos))
            })
            .map(|d| d.to);
        if let Some(to) = crossed {
            position.room = to;
        }
    }

    /// Place the player directly, e.g. when the host teleports it.
    pub fn set_player_place(&mut self, place: Place) {
        self.player.position.room = place.room;
        self.player.position.pos = place.pos;
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn signals(&self) -> &WorldSignals {
        &self.signals
    }

    /// Host-side inputs: stock, held item, productivity.
    pub fn signals_mut(&mut self) -> &mut WorldSignals {
        &mut self.signals
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// Seconds simulated so far.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<&Agent>().iter().count()
    }

    /// Every agent, in spawn order.
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        let mut query = self.world.query::<(&Agent, &Position, &Brain)>();
        let mut out: Vec<_> = query
            .iter()
            .map(|(entity, (agent, position, brain))| {
                (
                    entity.id(),
                    AgentSnapshot {
                        name: agent.name.clone(),
                        kind: agent.kind,
                        room: position.room,
                        position: position.pos,
                        facing: position.facing,
                        state: brain.state().name(),
                    },
                )
            })
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out.into_iter().map(|(_, snapshot)| snapshot).collect()
    }

    /// Snapshot of the named agent.
    pub fn agent(&self, name: &str) -> Option<AgentSnapshot> {
        self.snapshots().into_iter().find(|s| s.name == name)
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

fn spawn_agent(world: &mut World, floor: &Floor, config: &SimConfig, spec: &AgentSpec) -> Result<()> {
    let Some(room) = floor.room(spec.room) else {
        return Err(LevelError::UnknownAgentRoom {
            agent: spec.name.clone(),
            room: spec.room,
        });
    };

    let footprint = Footprint(config.nav.agent_size);
    let pos = if room.blocks(&footprint.rect_at(spec.pos)) {
        let snapped = floor.snap(spec.room, spec.pos);
        warn!("{} starts inside an obstacle, moved to {:?}", spec.name, snapped);
        snapped
    } else {
        spec.pos
    };
    let home = Place::new(spec.room, pos);
    let tuning = &config.agents;

    let brain = match spec.kind {
        AgentKind::Guardian => Brain::guardian(
            home,
            spec.patrol.clone(),
            spec.desk.unwrap_or(pos),
            tuning.guardian,
        ),
        AgentKind::Pursuer => Brain::pursuer(home, tuning.pursuer),
        AgentKind::Monitor => Brain::monitor(home, spec.desk.unwrap_or(pos), tuning.monitor),
        AgentKind::Scavenger => {
            let stash = spec.stash.ok_or_else(|| LevelError::MissingField {
                agent: spec.name.clone(),
                field: "stash",
            })?;
            if !floor.topology.has_room(stash.room) {
                return Err(LevelError::UnknownAgentRoom {
                    agent: spec.name.clone(),
                    room: stash.room,
                });
            }
            Brain::scavenger(home, stash, tuning.scavenger)
        }
        AgentKind::Sprinter => Brain::sprinter(home, tuning.sprinter),
    };

    let follower = PathFollower::new(brain.nav_profile());
    world.spawn((
        Agent {
            name: spec.name.clone(),
            kind: spec.kind,
        },
        Position::new(spec.room, pos),
        footprint,
        brain,
        follower,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterhours_logic::behavior::BehaviorState;

    fn linear_with(kind: AgentKind, at: Place) -> LevelSpec {
        LevelSpec::linear(3).with_agent("a", kind, at)
    }

    #[test]
    fn test_office_loads() {
        let sim = Simulation::from_level(&LevelSpec::office(), SimConfig::default()).unwrap();
        assert_eq!(sim.agent_count(), 5);
        assert_eq!(sim.status(), SimStatus::Running);
        assert_eq!(sim.signals().stock, 5);
        let names: Vec<_> = sim.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names[0], "Jo-nathan");
    }

    #[test]
    fn test_unknown_player_room_rejected() {
        let mut spec = LevelSpec::linear(2);
        spec.player.room = 9;
        assert!(matches!(
            Simulation::from_level(&spec, SimConfig::default()),
            Err(LevelError::UnknownPlayerRoom(9))
        ));
    }

    #[test]
    fn test_unknown_agent_room_rejected() {
        let spec = linear_with(AgentKind::Pursuer, Place::new(7, Vec2::new(10.0, 10.0)));
        assert!(matches!(
            Simulation::from_level(&spec, SimConfig::default()),
            Err(LevelError::UnknownAgentRoom { room: 7, .. })
        ));
    }

    #[test]
    fn test_scavenger_needs_stash() {
        let spec = linear_with(AgentKind::Scavenger, Place::new(1, Vec2::new(200.0, 150.0)));
        assert!(matches!(
            Simulation::from_level(&spec, SimConfig::default()),
            Err(LevelError::MissingField { field: "stash", .. })
        ));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut spec = LevelSpec::linear(2);
        spec.doors[0].b = 42;
        match Simulation::from_level(&spec, SimConfig::default()) {
            Err(LevelError::Invalid(errors)) => {
                assert!(errors.iter().any(|e| e.contains("doorway_validity")))
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("door into a missing room should not load"),
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Simulation::from_json("{ not json", SimConfig::default()),
            Err(LevelError::Json(_))
        ));
    }

    #[test]
    fn test_spawn_inside_wall_is_snapped() {
        let spec = linear_with(AgentKind::Pursuer, Place::new(1, Vec2::new(5.0, 5.0)));
        let sim = Simulation::from_level(&spec, SimConfig::default()).unwrap();
        let agent = sim.agent("a").unwrap();
        let grid = &sim.floor().nav(1).unwrap().grid;
        assert!(grid.is_walkable(agent.position.x, agent.position.y));
    }

    #[test]
    fn test_no_updates_after_capture() {
        let spec = linear_with(AgentKind::Pursuer, Place::new(1, Vec2::new(200.0, 150.0)));
        let mut sim = Simulation::from_level(&spec, SimConfig::default()).unwrap();
        for (_, brain) in sim.world.query_mut::<&mut Brain>() {
            brain.force_state(BehaviorState::Chase);
        }
        sim.update(0.1);
        assert_eq!(sim.status(), SimStatus::Caught);
        let events = sim.drain_events();
        assert_eq!(events.iter().filter(|e| e.is_capture()).count(), 1);

        let tick = sim.tick_count();
        let before = sim.snapshots();
        sim.update(0.1);
        assert_eq!(sim.tick_count(), tick);
        assert_eq!(sim.snapshots(), before);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_player_room_follows_doorways() {
        let mut sim = Simulation::from_level(&LevelSpec::linear(2), SimConfig::default()).unwrap();
        // Touching the door from room 1 is not enough
        sim.set_player_position(Vec2::new(390.0, 150.0));
        assert_eq!(sim.player().position.room, 1);
        assert_eq!(sim.player().position.facing, Facing::Right);
        // Center across the threshold
        sim.set_player_position(Vec2::new(410.0, 150.0));
        assert_eq!(sim.player().position.room, 2);
        // Backing up slightly does not flip straight back
        sim.set_player_position(Vec2::new(405.0, 150.0));
        assert_eq!(sim.player().position.room, 2);
        sim.set_player_position(Vec2::new(380.0, 150.0));
        assert_eq!(sim.player().position.room, 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut sim = Simulation::from_level(&LevelSpec::office(), SimConfig::default()).unwrap();
            for _ in 0..400 {
                sim.update(0.1);
            }
            sim.snapshots()
        };
        assert_eq!(run(), run());
    }
}
