//! Waypoint following and the re-path policy.
//!
//! A [`PathFollower`] owns at most one [`Path`]. Each tick it either keeps
//! following that path or throws it away and asks its [`PathProvider`] for a
//! new one. Paths are never edited in place.
//!
//! A path is discarded when:
//! - every waypoint has been reached,
//! - the target drifted more than `repath_distance` from the planned target,
//! - its jittered deadline (`repath_interval + U(0, repath_jitter)`) passed,
//! - the owner calls [`PathFollower::invalidate`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::astar;
use crate::constants::follow as defaults;
use crate::direct::{self, DirectParams};
use crate::geometry::{Rect, Vec2};
use crate::grid::NavGrid;
use crate::topology::Room;

/// Source of paths and local steering for one room.
pub trait PathProvider {
    /// Grid path from `start` to `goal`; empty when none exists.
    fn find_path(&self, start: Vec2, goal: Vec2) -> Vec<Vec2>;
    /// One-tick steering direction from `from` toward `to`.
    fn resolve_direction(&self, from: Vec2, to: Vec2) -> Vec2;
}

/// Precomputed navigation data for a single room.
#[derive(Debug, Clone)]
pub struct RoomNav {
    pub grid: NavGrid,
    pub bounds: Rect,
    pub obstacles: Vec<Rect>,
    pub direct: DirectParams,
}

impl RoomNav {
    pub fn new(room: &Room, cell_size: f32, clearance: f32, direct: DirectParams) -> Self {
        Self {
            grid: NavGrid::from_room(room, cell_size, clearance),
            bounds: room.bounds,
            obstacles: room.obstacles().copied().collect(),
            direct,
        }
    }
}

impl PathProvider for RoomNav {
    /// Endpoints sitting in blocked cells (doorway gaps, wall-hugging agents)
    /// are snapped to the nearest walkable cell first. A goal in a walkable
    /// cell replaces that cell's center as the final waypoint.
    fn find_path(&self, start: Vec2, goal: Vec2) -> Vec<Vec2> {
        let (Some(from), Some(to)) = (
            self.grid.snap_to_walkable(start),
            self.grid.snap_to_walkable(goal),
        ) else {
            return vec![];
        };
        let mut path = astar::find_path(&self.grid, from, to);
        if self.grid.is_walkable(goal.x, goal.y) {
            if let Some(last) = path.last_mut() {
                *last = goal;
            }
        }
        path
    }

    fn resolve_direction(&self, from: Vec2, to: Vec2) -> Vec2 {
        direct::resolve_direction(from, to, &self.obstacles, self.bounds, &self.direct)
    }
}

/// Which provider method drives an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavStrategy {
    #[default]
    Grid,
    Direct,
}

/// Per-agent navigation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavProfile {
    pub strategy: NavStrategy,
    /// Seconds before a path is replanned regardless of progress.
    pub repath_interval: f32,
    /// Upper bound of the random extra added to `repath_interval`.
    pub repath_jitter: f32,
}

impl Default for NavProfile {
    fn default() -> Self {
        Self {
            strategy: NavStrategy::Grid,
            repath_interval: 1.0,
            repath_jitter: 0.5,
        }
    }
}

/// Follower tuning shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowParams {
    pub repath_distance: f32,
    /// Waypoint arrival radius as a multiple of this tick's step.
    pub arrive_steps: f32,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            repath_distance: defaults::REPATH_DISTANCE,
            arrive_steps: defaults::ARRIVE_STEPS,
        }
    }
}

/// One planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub waypoints: Vec<Vec2>,
    pub index: usize,
    /// Target the path was planned for.
    pub target: Vec2,
    pub age: f32,
    pub repath_after: f32,
}

/// Outcome of one follower tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub pos: Vec2,
    /// Unit direction actually moved (zero when stationary).
    pub direction: Vec2,
    /// The follower has nothing left to walk toward.
    pub arrived: bool,
    /// A grid search came back empty and the direct resolver was used.
    pub fell_back: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    pub profile: NavProfile,
    path: Option<Path>,
}

impl PathFollower {
    pub fn new(profile: NavProfile) -> Self {
        Self {
            profile,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Drop the current path; the next step replans.
    pub fn invalidate(&mut self) {
        self.path = None;
    }

    fn needs_repath(&self, target: Vec2, params: &FollowParams) -> bool {
        match &self.path {
            None => true,
            Some(p) => {
                p.index >= p.waypoints.len()
                    || p.target.distance(&target) > params.repath_distance
                    || p.age >= p.repath_after
            }
        }
    }

    fn plan<R: Rng + ?Sized>(
        &mut self,
        provider: &dyn PathProvider,
        pos: Vec2,
        target: Vec2,
        rng: &mut R,
    ) -> bool {
        let waypoints = provider.find_path(pos, target);
        if waypoints.is_empty() {
            self.path = None;
            return false;
        }
        let jitter = if self.profile.repath_jitter > 0.0 {
            rng.gen_range(0.0..self.profile.repath_jitter)
        } else {
            0.0
        };
        self.path = Some(Path {
            waypoints,
            index: 0,
            target,
            age: 0.0,
            repath_after: self.profile.repath_interval + jitter,
        });
        true
    }

    /// Advance toward `target` by `speed * dt`.
    #[allow(clippy::too_many_arguments)]
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        provider: &dyn PathProvider,
        pos: Vec2,
        target: Vec2,
        speed: f32,
        dt: f32,
        params: &FollowParams,
        rng: &mut R,
    ) -> Step {
        let max_step = (speed * dt).max(0.0);
        if let Some(p) = self.path.as_mut() {
            p.age += dt;
        }

        if self.profile.strategy == NavStrategy::Direct {
            return direct_step(provider, pos, target, max_step, false);
        }

        if self.needs_repath(target, params) && !self.plan(provider, pos, target, rng) {
            return direct_step(provider, pos, target, max_step, true);
        }

        let arrive = params.arrive_steps * max_step;
        let Some(path) = self.path.as_mut() else {
            return direct_step(provider, pos, target, max_step, true);
        };
        while path.index < path.waypoints.len()
            && pos.distance(&path.waypoints[path.index]) < arrive
        {
            path.index += 1;
        }

        let Some(&waypoint) = path.waypoints.get(path.index) else {
            // Exhausted: settle onto the final waypoint and replan next tick.
            let last = path.waypoints.last().copied().unwrap_or(pos);
            self.path = None;
            let new_pos = pos.move_toward(last, max_step);
            return Step {
                pos: new_pos,
                direction: (new_pos - pos).normalize(),
                arrived: true,
                fell_back: false,
            };
        };

        let new_pos = pos.move_toward(waypoint, max_step);
        Step {
            pos: new_pos,
            direction: (new_pos - pos).normalize(),
            arrived: false,
            fell_back: false,
        }
    }
}

fn direct_step(
    provider: &dyn PathProvider,
    pos: Vec2,
    target: Vec2,
    max_step: f32,
    fell_back: bool,
) -> Step {
    let dir = provider.resolve_direction(pos, target);
    if dir == Vec2::ZERO {
        return Step {
            pos,
            direction: Vec2::ZERO,
            arrived: true,
            fell_back,
        };
    }
    let travel = max_step.min(pos.distance(&target));
    Step {
        pos: pos + dir * travel,
        direction: dir,
        arrived: false,
        fell_back,
    }
}
