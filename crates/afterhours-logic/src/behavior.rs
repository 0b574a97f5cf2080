//! Agent state machines for the five antagonist kinds.
//!
//! Every agent starts [`BehaviorState::Dormant`] and wakes after a
//! kind-specific activation delay. From then on [`Brain::think`] runs once
//! per tick, reads the shared [`WorldSignals`], and returns a [`Decision`]:
//! where to go and how fast. Movement itself belongs to the follower and
//! the engine; a brain never touches positions.
//!
//! | Kind | Wakes into | Hostile when |
//! |------|------------|--------------|
//! | Guardian | Patrol / AtDesk | stock at zero for `depletion_debounce` s |
//! | Pursuer | Chase | always, unless bought off with the item |
//! | Monitor | Patrol / AtDesk | idle meter above `idle_chase_after` |
//! | Scavenger | Idle / Fetching | never |
//! | Sprinter | Idle / Sprinting | only while dashing |

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::capture::{Cause, CaptureOutcome};
use crate::follow::NavProfile;
use crate::geometry::Vec2;
use crate::signals::WorldSignals;
use crate::topology::{LevelView, RoomId};
use crate::tuning::{
    GuardianTuning, MonitorTuning, PursuerTuning, ScavengerTuning, SprinterTuning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Guardian,
    Pursuer,
    Monitor,
    Scavenger,
    Sprinter,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Guardian => "guardian",
            AgentKind::Pursuer => "pursuer",
            AgentKind::Monitor => "monitor",
            AgentKind::Scavenger => "scavenger",
            AgentKind::Sprinter => "sprinter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    Dormant,
    Patrol,
    AtDesk,
    Chase,
    /// Pursuer carrying the item home.
    Returning,
    Eating,
    Fetching,
    Sprinting,
    ReturningHome,
    Idle,
}

impl BehaviorState {
    /// Symbolic name for presentation.
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Dormant => "dormant",
            BehaviorState::Patrol => "patrolling",
            BehaviorState::AtDesk => "at_desk",
            BehaviorState::Chase => "chasing",
            BehaviorState::Returning => "returning",
            BehaviorState::Eating => "eating",
            BehaviorState::Fetching => "fetching",
            BehaviorState::Sprinting => "sprinting",
            BehaviorState::ReturningHome => "returning_home",
            BehaviorState::Idle => "idle",
        }
    }
}

/// A point inside a specific room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub room: RoomId,
    pub pos: Vec2,
}

impl Place {
    pub fn new(room: RoomId, pos: Vec2) -> Self {
        Self { room, pos }
    }
}

/// Where the agent wants to be this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// Stay put.
    Hold,
    Place(Place),
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub goal: Goal,
    pub speed: f32,
    /// Set on the tick a scavenger takes a unit of stock.
    pub took_stock: bool,
}

impl Decision {
    fn hold() -> Self {
        Self {
            goal: Goal::Hold,
            speed: 0.0,
            took_stock: false,
        }
    }

    fn go(place: Place, speed: f32) -> Self {
        Self {
            goal: Goal::Place(place),
            speed,
            took_stock: false,
        }
    }

    fn chase(speed: f32) -> Self {
        Self {
            goal: Goal::Player,
            speed,
            took_stock: false,
        }
    }
}

/// Everything a brain may look at during one tick.
pub struct ThinkContext<'a> {
    pub dt: f32,
    pub pos: Vec2,
    pub room: RoomId,
    pub signals: &'a mut WorldSignals,
    pub level: &'a dyn LevelView,
    pub rng: &'a mut dyn RngCore,
}

impl ThinkContext<'_> {
    fn near(&self, place: &Place, radius: f32) -> bool {
        self.room == place.room && self.pos.distance(&place.pos) < radius
    }

    /// Center of a random room, preferring one other than `avoid`.
    fn random_room_center(&mut self, avoid: RoomId) -> Option<Place> {
        let mut ids = self.level.room_ids();
        if ids.len() > 1 {
            ids.retain(|&id| id != avoid);
        }
        self.center_of_any(&ids)
    }

    /// Center of a random room one doorway away from the current one.
    fn adjacent_room_center(&mut self) -> Option<Place> {
        let ids = self.level.adjacent_rooms(self.room);
        self.center_of_any(&ids)
    }

    fn center_of_any(&mut self, ids: &[RoomId]) -> Option<Place> {
        let room = *ids.choose(&mut *self.rng)?;
        self.level
            .room_center(room)
            .map(|pos| Place::new(room, pos))
    }
}

#[derive(Debug, Clone)]
enum Mind {
    Guardian {
        tuning: GuardianTuning,
        patrol: Vec<Vec2>,
        cursor: usize,
        desk: Vec2,
        /// Seconds the stock has been observed at zero; `None` while stocked.
        depleted_for: Option<f32>,
    },
    Pursuer {
        tuning: PursuerTuning,
    },
    Monitor {
        tuning: MonitorTuning,
        desk: Vec2,
        roam: Option<Place>,
    },
    Scavenger {
        tuning: ScavengerTuning,
        stash: Place,
    },
    Sprinter {
        tuning: SprinterTuning,
        target: Option<Place>,
        dashing: bool,
    },
}

/// Per-agent state machine.
#[derive(Debug, Clone)]
pub struct Brain {
    state: BehaviorState,
    /// Seconds since spawn, drives activation.
    awake_for: f32,
    /// Seconds spent in the current phase (patrol leg, desk dwell, eating,
    /// idle cooldown, sprint).
    phase: f32,
    home: Place,
    mind: Mind,
}

impl Brain {
    fn with(home: Place, mind: Mind) -> Self {
        Self {
            state: BehaviorState::Dormant,
            awake_for: 0.0,
            phase: 0.0,
            home,
            mind,
        }
    }

    pub fn guardian(home: Place, patrol: Vec<Vec2>, desk: Vec2, tuning: GuardianTuning) -> Self {
        Self::with(
            home,
            Mind::Guardian {
                tuning,
                patrol,
                cursor: 0,
                desk,
                depleted_for: None,
            },
        )
    }

    pub fn pursuer(home: Place, tuning: PursuerTuning) -> Self {
        Self::with(home, Mind::Pursuer { tuning })
    }

    pub fn monitor(home: Place, desk: Vec2, tuning: MonitorTuning) -> Self {
        Self::with(
            home,
            Mind::Monitor {
                tuning,
                desk,
                roam: None,
            },
        )
    }

    pub fn scavenger(home: Place, stash: Place, tuning: ScavengerTuning) -> Self {
        Self::with(home, Mind::Scavenger { tuning, stash })
    }

    pub fn sprinter(home: Place, tuning: SprinterTuning) -> Self {
        Self::with(
            home,
            Mind::Sprinter {
                tuning,
                target: None,
                dashing: false,
            },
        )
    }

    pub fn kind(&self) -> AgentKind {
        match self.mind {
            Mind::Guardian { .. } => AgentKind::Guardian,
            Mind::Pursuer { .. } => AgentKind::Pursuer,
            Mind::Monitor { .. } => AgentKind::Monitor,
            Mind::Scavenger { .. } => AgentKind::Scavenger,
            Mind::Sprinter { .. } => AgentKind::Sprinter,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn home(&self) -> Place {
        self.home
    }

    /// Whether a sprinter is mid-dash. Always `false` for other kinds.
    pub fn dashing(&self) -> bool {
        matches!(self.mind, Mind::Sprinter { dashing: true, .. })
    }

    /// Seconds the stock has been observed at zero (guardian only).
    pub fn depleted_for(&self) -> Option<f32> {
        match self.mind {
            Mind::Guardian { depleted_for, .. } => depleted_for,
            _ => None,
        }
    }

    pub fn nav_profile(&self) -> NavProfile {
        match &self.mind {
            Mind::Guardian { tuning, .. } => tuning.nav,
            Mind::Pursuer { tuning } => tuning.nav,
            Mind::Monitor { tuning, .. } => tuning.nav,
            Mind::Scavenger { tuning, .. } => tuning.nav,
            Mind::Sprinter { tuning, .. } => tuning.nav,
        }
    }

    fn activation(&self) -> f32 {
        match &self.mind {
            Mind::Guardian { tuning, .. } => tuning.activation,
            Mind::Pursuer { tuning } => tuning.activation,
            Mind::Monitor { tuning, .. } => tuning.activation,
            Mind::Scavenger { tuning, .. } => tuning.activation,
            Mind::Sprinter { tuning, .. } => tuning.activation,
        }
    }

    /// Override the current state and restart its phase clock.
    ///
    /// Used by scenario setup; normal play only changes state via
    /// [`Self::think`] and [`Self::on_collide_with_player`].
    pub fn force_state(&mut self, state: BehaviorState) {
        self.enter(state);
        if let Mind::Sprinter { dashing, .. } = &mut self.mind {
            *dashing = state == BehaviorState::Sprinting;
        }
    }

    fn enter(&mut self, state: BehaviorState) {
        self.state = state;
        self.phase = 0.0;
    }

    fn wake_state(&self) -> BehaviorState {
        match self.mind {
            Mind::Guardian { .. } | Mind::Monitor { .. } => BehaviorState::Patrol,
            Mind::Pursuer { .. } => BehaviorState::Chase,
            Mind::Scavenger { .. } | Mind::Sprinter { .. } => BehaviorState::Idle,
        }
    }

    /// Advance one tick and decide where to go.
    pub fn think(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        self.awake_for += ctx.dt;
        if self.state == BehaviorState::Dormant {
            if self.awake_for < self.activation() {
                return Decision::hold();
            }
            let next = self.wake_state();
            self.enter(next);
        } else {
            self.phase += ctx.dt;
        }

        match self.kind() {
            AgentKind::Guardian => self.think_guardian(ctx),
            AgentKind::Pursuer => self.think_pursuer(ctx),
            AgentKind::Monitor => self.think_monitor(ctx),
            AgentKind::Scavenger => self.think_scavenger(ctx),
            AgentKind::Sprinter => self.think_sprinter(ctx),
        }
    }

    fn think_guardian(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        let Mind::Guardian {
            tuning,
            patrol,
            cursor,
            desk,
            depleted_for,
        } = &mut self.mind
        else {
            return Decision::hold();
        };
        let tuning = *tuning;

        if ctx.signals.depleted() {
            let t = match *depleted_for {
                None => 0.0,
                Some(t) => t + ctx.dt,
            };
            *depleted_for = Some(t);
            if t >= tuning.depletion_debounce && self.state != BehaviorState::Chase {
                self.state = BehaviorState::Chase;
                self.phase = 0.0;
            }
        } else {
            *depleted_for = None;
            if self.state == BehaviorState::Chase {
                self.state = BehaviorState::Patrol;
                self.phase = 0.0;
            }
        }

        let room = self.home.room;
        match self.state {
            BehaviorState::Chase => Decision::chase(tuning.chase_speed),
            BehaviorState::AtDesk => {
                if self.phase >= tuning.desk_duration {
                    self.state = BehaviorState::Patrol;
                    self.phase = 0.0;
                }
                Decision::go(Place::new(room, *desk), tuning.patrol_speed)
            }
            _ => {
                if self.phase >= tuning.patrol_duration {
                    self.state = BehaviorState::AtDesk;
                    self.phase = 0.0;
                    return Decision::go(Place::new(room, *desk), tuning.patrol_speed);
                }
                if patrol.is_empty() {
                    return Decision::go(self.home, tuning.patrol_speed);
                }
                let mut point = Place::new(room, patrol[*cursor % patrol.len()]);
                if ctx.near(&point, tuning.waypoint_radius) {
                    *cursor = (*cursor + 1) % patrol.len();
                    point = Place::new(room, patrol[*cursor]);
                }
                Decision::go(point, tuning.patrol_speed)
            }
        }
    }

    fn think_pursuer(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        let Mind::Pursuer { tuning } = self.mind else {
            return Decision::hold();
        };
        match self.state {
            BehaviorState::Returning => {
                if ctx.near(&self.home, tuning.home_radius) {
                    self.enter(BehaviorState::Eating);
                    return Decision::hold();
                }
                Decision::go(self.home, tuning.chase_speed * tuning.return_speed_factor)
            }
            BehaviorState::Eating => {
                // Fed before waking: the meal starts once activation runs out
                if self.awake_for < tuning.activation {
                    self.phase = 0.0;
                    return Decision::hold();
                }
                if self.phase >= tuning.eating_duration {
                    self.enter(BehaviorState::Chase);
                    return Decision::chase(tuning.chase_speed);
                }
                Decision::hold()
            }
            _ => {
                if self.state != BehaviorState::Chase {
                    self.enter(BehaviorState::Chase);
                }
                Decision::chase(tuning.chase_speed)
            }
        }
    }

    fn think_monitor(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        let Mind::Monitor { tuning, desk, roam } = &mut self.mind else {
            return Decision::hold();
        };
        let tuning = *tuning;
        let idle = ctx.signals.idle.value;

        if self.state == BehaviorState::Chase {
            if idle < tuning.idle_release_below {
                self.state = BehaviorState::Patrol;
                self.phase = 0.0;
                *roam = None;
            } else {
                return Decision::chase(tuning.chase_speed);
            }
        } else if idle > tuning.idle_chase_after {
            self.state = BehaviorState::Chase;
            self.phase = 0.0;
            return Decision::chase(tuning.chase_speed);
        }

        let desk_place = Place::new(self.home.room, *desk);
        let desk_speed = tuning.patrol_speed * tuning.desk_speed_factor;
        match self.state {
            BehaviorState::AtDesk => {
                if self.phase >= tuning.desk_duration {
                    self.state = BehaviorState::Patrol;
                    self.phase = 0.0;
                    *roam = None;
                }
                Decision::go(desk_place, desk_speed)
            }
            _ => {
                if self.phase >= tuning.roam_duration {
                    self.state = BehaviorState::AtDesk;
                    self.phase = 0.0;
                    return Decision::go(desk_place, desk_speed);
                }
                let reached = roam
                    .as_ref()
                    .map_or(true, |p| ctx.near(p, tuning.arrive_radius));
                if reached {
                    *roam = ctx.adjacent_room_center();
                }
                match *roam {
                    Some(place) => Decision::go(place, tuning.patrol_speed),
                    None => Decision::go(desk_place, tuning.patrol_speed),
                }
            }
        }
    }

    fn think_scavenger(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        let Mind::Scavenger { tuning, stash } = self.mind else {
            return Decision::hold();
        };
        match self.state {
            BehaviorState::Fetching => {
                if ctx.near(&stash, tuning.fetch_radius) {
                    let took = ctx.signals.take_stock();
                    self.enter(BehaviorState::ReturningHome);
                    return Decision {
                        took_stock: took,
                        ..Decision::go(self.home, tuning.speed)
                    };
                }
                Decision::go(stash, tuning.speed)
            }
            BehaviorState::ReturningHome => {
                if ctx.near(&self.home, tuning.home_radius) {
                    self.enter(BehaviorState::Idle);
                    return Decision::hold();
                }
                Decision::go(self.home, tuning.speed)
            }
            _ => {
                if self.state != BehaviorState::Idle {
                    self.enter(BehaviorState::Idle);
                }
                if self.phase >= tuning.snack_interval {
                    self.enter(BehaviorState::Fetching);
                    return Decision::go(stash, tuning.speed);
                }
                Decision::hold()
            }
        }
    }

    fn think_sprinter(&mut self, ctx: &mut ThinkContext<'_>) -> Decision {
        let home = self.home;
        let Mind::Sprinter {
            tuning,
            target,
            dashing,
        } = &mut self.mind
        else {
            return Decision::hold();
        };
        let tuning = *tuning;
        match self.state {
            BehaviorState::Sprinting => {
                if self.phase >= tuning.sprint_duration {
                    *dashing = false;
                    *target = None;
                    self.state = BehaviorState::ReturningHome;
                    self.phase = 0.0;
                    return Decision::go(home, tuning.speed);
                }
                let reached = target
                    .as_ref()
                    .map_or(true, |p| ctx.near(p, tuning.arrive_radius));
                if reached {
                    *target = ctx.random_room_center(ctx.room);
                }
                match *target {
                    Some(place) => Decision::go(place, tuning.sprint_speed),
                    None => Decision::hold(),
                }
            }
            BehaviorState::ReturningHome => {
                if ctx.near(&home, tuning.home_radius) {
                    self.state = BehaviorState::Idle;
                    self.phase = 0.0;
                    return Decision::hold();
                }
                Decision::go(home, tuning.speed)
            }
            _ => {
                if self.state != BehaviorState::Idle {
                    self.state = BehaviorState::Idle;
                    self.phase = 0.0;
                }
                if self.phase >= tuning.cooldown {
                    *dashing = true;
                    *target = ctx.random_room_center(ctx.room);
                    self.state = BehaviorState::Sprinting;
                    self.phase = 0.0;
                    return match *target {
                        Some(place) => Decision::go(place, tuning.sprint_speed),
                        None => Decision::hold(),
                    };
                }
                Decision::hold()
            }
        }
    }

    /// Outcome of this agent overlapping the player, applying any side
    /// effect to the shared signals.
    pub fn on_collide_with_player(&mut self, signals: &mut WorldSignals) -> CaptureOutcome {
        match self.kind() {
            AgentKind::Guardian if self.state == BehaviorState::Chase => {
                CaptureOutcome::PlayerCaught(Cause::ResourceDepleted)
            }
            AgentKind::Pursuer => match self.state {
                BehaviorState::Dormant | BehaviorState::Chase if signals.player_has_item => {
                    signals.player_has_item = false;
                    self.enter(BehaviorState::Returning);
                    CaptureOutcome::ResourceExchanged(Cause::ItemTaken)
                }
                BehaviorState::Chase => CaptureOutcome::PlayerCaught(Cause::NoItemOffered),
                _ => CaptureOutcome::NoEffect,
            },
            AgentKind::Monitor if self.state == BehaviorState::Chase => {
                CaptureOutcome::PlayerCaught(Cause::CaughtSlacking)
            }
            AgentKind::Sprinter if self.dashing() => CaptureOutcome::PlayerCaught(Cause::RanOver),
            _ => CaptureOutcome::NoEffect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::KindTuning;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct TwoRooms;

    impl LevelView for TwoRooms {
        fn room_ids(&self) -> Vec<RoomId> {
            vec![1, 2]
        }
        fn room_center(&self, room: RoomId) -> Option<Vec2> {
            match room {
                1 => Some(Vec2::new(200.0, 150.0)),
                2 => Some(Vec2::new(600.0, 150.0)),
                _ => None,
            }
        }
        fn adjacent_rooms(&self, room: RoomId) -> Vec<RoomId> {
            match room {
                1 => vec![2],
                2 => vec![1],
                _ => vec![],
            }
        }
    }

    /// Thinks `ticks` times at a fixed position; returns the last decision.
    fn run(
        brain: &mut Brain,
        signals: &mut WorldSignals,
        place: Place,
        dt: f32,
        ticks: usize,
        rng: &mut StdRng,
    ) -> Decision {
        let mut last = Decision::hold();
        for _ in 0..ticks {
            let mut ctx = ThinkContext {
                dt,
                pos: place.pos,
                room: place.room,
                signals: &mut *signals,
                level: &TwoRooms,
                rng: &mut *rng,
            };
            last = brain.think(&mut ctx);
        }
        last
    }

    fn home() -> Place {
        Place::new(1, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_state_names() {
        assert_eq!(BehaviorState::Dormant.name(), "dormant");
        assert_eq!(BehaviorState::Patrol.name(), "patrolling");
        assert_eq!(BehaviorState::AtDesk.name(), "at_desk");
        assert_eq!(BehaviorState::Chase.name(), "chasing");
        assert_eq!(BehaviorState::ReturningHome.name(), "returning_home");
    }

    #[test]
    fn test_dormant_until_activation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut signals = WorldSignals::default();
        let mut b = Brain::pursuer(home(), KindTuning::default().pursuer);
        let d = run(&mut b, &mut signals, home(), 1.0, 29, &mut rng);
        assert_eq!(b.state(), BehaviorState::Dormant);
        assert_eq!(d.goal, Goal::Hold);
        let d = run(&mut b, &mut signals, home(), 1.0, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);
        assert_eq!(d.goal, Goal::Player);
        assert_eq!(d.speed, 60.0);
    }

    #[test]
    fn test_pursuer_only_dormant_or_chase_without_exchange() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut signals = WorldSignals::default();
        let mut b = Brain::pursuer(home(), KindTuning::default().pursuer);
        let mut seen_chase = false;
        for i in 0..2000 {
            let pos = Place::new(1 + (i % 2) as RoomId, Vec2::new(i as f32 % 300.0, 120.0));
            run(&mut b, &mut signals, pos, 0.05, 1, &mut rng);
            assert!(matches!(
                b.state(),
                BehaviorState::Dormant | BehaviorState::Chase
            ));
            seen_chase |= b.state() == BehaviorState::Chase;
            signals.idle.update(0.05, i % 3 == 0);
            signals.stock = (i % 4) as u32;
        }
        assert!(seen_chase);
    }

    #[test]
    fn test_pursuer_exchange_cycle() {
        let mut rng = StdRng::seed_from_u64(3);
        let t = KindTuning::default().pursuer;
        let mut signals = WorldSignals {
            player_has_item: true,
            ..Default::default()
        };
        let mut b = Brain::pursuer(home(), t);
        run(&mut b, &mut signals, home(), 1.0, 30, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);
        assert_eq!(
            b.on_collide_with_player(&mut signals),
            CaptureOutcome::ResourceExchanged(Cause::ItemTaken)
        );
        assert!(!signals.player_has_item);

        // Away from home: walks back at 1.5x
        let away = Place::new(2, Vec2::new(600.0, 150.0));
        let d = run(&mut b, &mut signals, away, 0.1, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Returning);
        assert_eq!(d.goal, Goal::Place(home()));
        assert!((d.speed - 90.0).abs() < 1e-4);

        // At home: eats without moving, then re-arms
        let d = run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Eating);
        assert_eq!(d.goal, Goal::Hold);
        run(&mut b, &mut signals, home(), 0.5, 19, &mut rng);
        assert_eq!(b.state(), BehaviorState::Eating);
        let d = run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);
        assert_eq!(d.goal, Goal::Player);
    }

    #[test]
    fn test_item_before_activation_delays_first_chase() {
        let mut rng = StdRng::seed_from_u64(15);
        let t = KindTuning::default().pursuer;
        let mut signals = WorldSignals {
            player_has_item: true,
            ..Default::default()
        };
        let mut b = Brain::pursuer(home(), t);
        assert_eq!(
            b.on_collide_with_player(&mut signals),
            CaptureOutcome::ResourceExchanged(Cause::ItemTaken)
        );
        assert_eq!(b.state(), BehaviorState::Returning);

        // Activation still runs out first, then the full meal
        let mut first_chase = None;
        for tick in 1..=500 {
            run(&mut b, &mut signals, home(), 0.1, 1, &mut rng);
            if b.state() == BehaviorState::Chase {
                first_chase = Some(tick as f32 * 0.1);
                break;
            }
            assert_ne!(b.state(), BehaviorState::Dormant);
        }
        let at = first_chase.unwrap();
        assert!(at >= t.activation + t.eating_duration - 0.2, "chased at {at}");
        assert!(at < t.activation + t.eating_duration + 0.5, "chased at {at}");
    }

    #[test]
    fn test_dormant_pursuer_without_item_is_harmless() {
        let mut signals = WorldSignals::default();
        let mut b = Brain::pursuer(home(), KindTuning::default().pursuer);
        assert_eq!(b.on_collide_with_player(&mut signals), CaptureOutcome::NoEffect);
        assert_eq!(b.state(), BehaviorState::Dormant);
    }

    #[test]
    fn test_guardian_debounce_enters_chase_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut signals = WorldSignals::default();
        let mut b = Brain::guardian(
            home(),
            vec![Vec2::new(100.0, 100.0), Vec2::new(300.0, 100.0)],
            Vec2::new(150.0, 200.0),
            KindTuning::default().guardian,
        );
        run(&mut b, &mut signals, home(), 0.25, 100, &mut rng);
        assert_ne!(b.state(), BehaviorState::Chase);

        signals.stock = 0;
        let mut entered = Vec::new();
        let mut prev = b.state();
        for tick in 100..200 {
            run(&mut b, &mut signals, home(), 0.25, 1, &mut rng);
            if b.state() == BehaviorState::Chase && prev != BehaviorState::Chase {
                entered.push(tick);
            }
            prev = b.state();
        }
        assert_eq!(entered, vec![140]);
        assert_eq!(b.depleted_for(), Some(99.0 * 0.25));
    }

    #[test]
    fn test_guardian_restock_returns_to_patrol() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut signals = WorldSignals {
            stock: 0,
            ..Default::default()
        };
        let mut b = Brain::guardian(home(), vec![], Vec2::new(150.0, 200.0), KindTuning::default().guardian);
        run(&mut b, &mut signals, home(), 0.5, 60, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);
        signals.stock = 2;
        let d = run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Patrol);
        assert_eq!(b.depleted_for(), None);
        assert_eq!(d.speed, 50.0);
    }

    #[test]
    fn test_guardian_brief_depletion_resets_debounce() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut signals = WorldSignals::default();
        let mut b = Brain::guardian(home(), vec![], Vec2::new(150.0, 200.0), KindTuning::default().guardian);
        run(&mut b, &mut signals, home(), 0.5, 20, &mut rng);
        for _ in 0..5 {
            signals.stock = 0;
            run(&mut b, &mut signals, home(), 0.5, 15, &mut rng);
            signals.stock = 1;
            run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        }
        assert_ne!(b.state(), BehaviorState::Chase);
    }

    #[test]
    fn test_guardian_patrol_then_desk() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut signals = WorldSignals::default();
        let desk = Vec2::new(150.0, 200.0);
        let mut b = Brain::guardian(home(), vec![Vec2::new(300.0, 100.0)], desk, KindTuning::default().guardian);
        run(&mut b, &mut signals, home(), 0.5, 16, &mut rng);
        assert_eq!(b.state(), BehaviorState::Patrol);
        // 10 s leg ends, desk dwell begins
        let d = run(&mut b, &mut signals, home(), 0.5, 20, &mut rng);
        assert_eq!(b.state(), BehaviorState::AtDesk);
        assert_eq!(d.goal, Goal::Place(Place::new(1, desk)));
    }

    #[test]
    fn test_monitor_hysteresis() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut signals = WorldSignals::default();
        let mut b = Brain::monitor(home(), Vec2::new(150.0, 200.0), KindTuning::default().monitor);
        run(&mut b, &mut signals, home(), 0.5, 20, &mut rng);
        assert_ne!(b.state(), BehaviorState::Chase);

        signals.idle.value = 31.0;
        let d = run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);
        assert_eq!(d.goal, Goal::Player);

        // Between the two thresholds: keeps chasing
        signals.idle.value = 25.0;
        run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Chase);

        signals.idle.value = 19.0;
        run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Patrol);
        assert_eq!(b.on_collide_with_player(&mut signals), CaptureOutcome::NoEffect);
    }

    #[test]
    fn test_monitor_desk_at_half_speed() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut signals = WorldSignals::default();
        let mut b = Brain::monitor(home(), Vec2::new(150.0, 200.0), KindTuning::default().monitor);
        // 10 s dormant + 15 s roaming
        let d = run(&mut b, &mut signals, home(), 0.5, 51, &mut rng);
        assert_eq!(b.state(), BehaviorState::AtDesk);
        assert_eq!(d.speed, 35.0);
    }

    #[test]
    fn test_monitor_roams_other_rooms() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut signals = WorldSignals::default();
        let mut b = Brain::monitor(home(), Vec2::new(150.0, 200.0), KindTuning::default().monitor);
        let d = run(&mut b, &mut signals, home(), 0.5, 21, &mut rng);
        assert_eq!(b.state(), BehaviorState::Patrol);
        assert_eq!(d.goal, Goal::Place(Place::new(2, Vec2::new(600.0, 150.0))));
    }

    /// Rooms 1 - 2 - 3 in a row; room 3 is not reachable from 1 in one hop.
    struct Corridor;

    impl LevelView for Corridor {
        fn room_ids(&self) -> Vec<RoomId> {
            vec![1, 2, 3]
        }
        fn room_center(&self, room: RoomId) -> Option<Vec2> {
            (1..=3)
                .contains(&room)
                .then(|| Vec2::new(room as f32 * 400.0 - 200.0, 150.0))
        }
        fn adjacent_rooms(&self, room: RoomId) -> Vec<RoomId> {
            match room {
                1 => vec![2],
                2 => vec![1, 3],
                3 => vec![2],
                _ => vec![],
            }
        }
    }

    #[test]
    fn test_monitor_roams_only_adjacent_rooms() {
        let mut signals = WorldSignals::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut b = Brain::monitor(home(), Vec2::new(150.0, 200.0), KindTuning::default().monitor);
            let mut ctx = ThinkContext {
                dt: 10.5,
                pos: home().pos,
                room: 1,
                signals: &mut signals,
                level: &Corridor,
                rng: &mut rng,
            };
            let d = b.think(&mut ctx);
            assert_eq!(b.state(), BehaviorState::Patrol);
            assert_eq!(d.goal, Goal::Place(Place::new(2, Vec2::new(600.0, 150.0))));

            // From the middle room either neighbor is fine, never the middle itself
            ctx.room = 2;
            ctx.pos = Vec2::new(600.0, 150.0);
            ctx.dt = 0.1;
            let d = b.think(&mut ctx);
            let Goal::Place(next) = d.goal else {
                panic!("expected a roam target, got {:?}", d.goal);
            };
            assert!(next.room == 1 || next.room == 3, "roamed to {}", next.room);
        }
    }

    #[test]
    fn test_scavenger_cycle_takes_one_stock() {
        let mut rng = StdRng::seed_from_u64(11);
        let t = KindTuning::default().scavenger;
        let stash = Place::new(2, Vec2::new(600.0, 150.0));
        let mut signals = WorldSignals::default();
        let mut b = Brain::scavenger(home(), stash, t);

        // 15 s activation + 45 s interval
        run(&mut b, &mut signals, home(), 1.0, 59, &mut rng);
        assert_eq!(b.state(), BehaviorState::Idle);
        let d = run(&mut b, &mut signals, home(), 1.0, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Fetching);
        assert_eq!(d.goal, Goal::Place(stash));

        let d = run(&mut b, &mut signals, Place::new(2, Vec2::new(620.0, 150.0)), 1.0, 1, &mut rng);
        assert!(d.took_stock);
        assert_eq!(signals.stock, 2);
        assert_eq!(b.state(), BehaviorState::ReturningHome);

        run(&mut b, &mut signals, home(), 1.0, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Idle);
        assert_eq!(signals.stock, 2);
    }

    #[test]
    fn test_scavenger_empty_stock_stays_zero() {
        let mut rng = StdRng::seed_from_u64(12);
        let stash = Place::new(1, Vec2::new(100.0, 100.0));
        let mut signals = WorldSignals {
            stock: 0,
            ..Default::default()
        };
        let mut b = Brain::scavenger(home(), stash, KindTuning::default().scavenger);
        b.force_state(BehaviorState::Fetching);
        let d = run(&mut b, &mut signals, stash, 1.0, 1, &mut rng);
        assert!(!d.took_stock);
        assert_eq!(signals.stock, 0);
    }

    #[test]
    fn test_sprinter_dash_window() {
        let mut rng = StdRng::seed_from_u64(13);
        let t = KindTuning::default().sprinter;
        let mut signals = WorldSignals::default();
        let mut b = Brain::sprinter(home(), t);

        // 20 s activation, then 10 s cooldown
        run(&mut b, &mut signals, home(), 0.5, 59, &mut rng);
        assert_eq!(b.state(), BehaviorState::Idle);
        assert!(!b.dashing());
        assert_eq!(b.on_collide_with_player(&mut signals), CaptureOutcome::NoEffect);

        let d = run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Sprinting);
        assert!(b.dashing());
        assert_eq!(d.speed, 200.0);
        assert_eq!(d.goal, Goal::Place(Place::new(2, Vec2::new(600.0, 150.0))));
        assert_eq!(
            b.on_collide_with_player(&mut signals),
            CaptureOutcome::PlayerCaught(Cause::RanOver)
        );

        let away = Place::new(2, Vec2::new(400.0, 150.0));
        run(&mut b, &mut signals, away, 0.5, 6, &mut rng);
        assert_eq!(b.state(), BehaviorState::ReturningHome);
        assert!(!b.dashing());
        run(&mut b, &mut signals, home(), 0.5, 1, &mut rng);
        assert_eq!(b.state(), BehaviorState::Idle);
    }

    #[test]
    fn test_scavenger_never_chases() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut signals = WorldSignals {
            stock: 0,
            ..Default::default()
        };
        signals.idle.value = 100.0;
        let mut b = Brain::scavenger(home(), Place::new(2, Vec2::new(600.0, 150.0)), KindTuning::default().scavenger);
        for i in 0..500 {
            let at = if i % 2 == 0 { home() } else { Place::new(2, Vec2::new(600.0, 150.0)) };
            let d = run(&mut b, &mut signals, at, 0.5, 1, &mut rng);
            assert_ne!(d.goal, Goal::Player);
            assert_eq!(b.on_collide_with_player(&mut signals), CaptureOutcome::NoEffect);
        }
    }
}
