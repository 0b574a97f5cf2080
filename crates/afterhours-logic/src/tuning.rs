//! Per-kind tunable parameters.
//!
//! Defaults reproduce the shipped game feel. Every struct is
//! `#[serde(default)]` so configs only need to list what they change.

use serde::{Deserialize, Serialize};

use crate::constants::{idle, timers};
use crate::follow::{NavProfile, NavStrategy};

/// Guardian: patrols its room, turns hostile once stock stays at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianTuning {
    pub activation: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub depletion_debounce: f32,
    /// Seconds spent walking the patrol loop before returning to the desk.
    pub patrol_duration: f32,
    pub desk_duration: f32,
    /// Distance at which a patrol waypoint counts as visited.
    pub waypoint_radius: f32,
    pub nav: NavProfile,
}

impl Default for GuardianTuning {
    fn default() -> Self {
        Self {
            activation: timers::GUARDIAN_ACTIVATION,
            patrol_speed: 50.0,
            chase_speed: 85.0,
            depletion_debounce: timers::DEPLETION_DEBOUNCE,
            patrol_duration: 10.0,
            desk_duration: 5.0,
            waypoint_radius: 15.0,
            nav: NavProfile::default(),
        }
    }
}

/// Pursuer: chases relentlessly unless bought off with the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerTuning {
    pub activation: f32,
    pub chase_speed: f32,
    /// Multiplier on `chase_speed` while carrying the item home.
    pub return_speed_factor: f32,
    pub eating_duration: f32,
    pub home_radius: f32,
    pub nav: NavProfile,
}

impl Default for PursuerTuning {
    fn default() -> Self {
        Self {
            activation: timers::PURSUER_ACTIVATION,
            chase_speed: 60.0,
            return_speed_factor: 1.5,
            eating_duration: timers::EATING_DURATION,
            home_radius: 10.0,
            nav: NavProfile::default(),
        }
    }
}

/// Monitor: roams and sits at its desk; chases an idle player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorTuning {
    pub activation: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Multiplier on `patrol_speed` while walking to or sitting at the desk.
    pub desk_speed_factor: f32,
    pub roam_duration: f32,
    pub desk_duration: f32,
    pub idle_chase_after: f32,
    pub idle_release_below: f32,
    /// Distance at which a roam target counts as reached.
    pub arrive_radius: f32,
    pub nav: NavProfile,
}

impl Default for MonitorTuning {
    fn default() -> Self {
        Self {
            activation: timers::MONITOR_ACTIVATION,
            patrol_speed: 70.0,
            chase_speed: 70.0,
            desk_speed_factor: 0.5,
            roam_duration: 15.0,
            desk_duration: 8.0,
            idle_chase_after: idle::CHASE_AFTER,
            idle_release_below: idle::RELEASE_BELOW,
            arrive_radius: 20.0,
            nav: NavProfile::default(),
        }
    }
}

/// Scavenger: periodically raids the stock; harmless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScavengerTuning {
    pub activation: f32,
    pub speed: f32,
    pub snack_interval: f32,
    pub fetch_radius: f32,
    pub home_radius: f32,
    pub nav: NavProfile,
}

impl Default for ScavengerTuning {
    fn default() -> Self {
        Self {
            activation: timers::SCAVENGER_ACTIVATION,
            speed: 60.0,
            snack_interval: timers::SNACK_INTERVAL,
            fetch_radius: 50.0,
            home_radius: 20.0,
            nav: NavProfile {
                strategy: NavStrategy::Direct,
                ..NavProfile::default()
            },
        }
    }
}

/// Sprinter: idles, then dashes between random rooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprinterTuning {
    pub activation: f32,
    pub speed: f32,
    pub sprint_speed: f32,
    pub sprint_duration: f32,
    pub cooldown: f32,
    /// Distance at which a sprint target counts as reached.
    pub arrive_radius: f32,
    pub home_radius: f32,
    pub nav: NavProfile,
}

impl Default for SprinterTuning {
    fn default() -> Self {
        Self {
            activation: timers::SPRINTER_ACTIVATION,
            speed: 40.0,
            sprint_speed: 200.0,
            sprint_duration: timers::SPRINT_DURATION,
            cooldown: timers::SPRINT_COOLDOWN,
            arrive_radius: 20.0,
            home_radius: 20.0,
            nav: NavProfile {
                strategy: NavStrategy::Direct,
                ..NavProfile::default()
            },
        }
    }
}

/// Tuning for every agent kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindTuning {
    pub guardian: GuardianTuning,
    pub pursuer: PursuerTuning,
    pub monitor: MonitorTuning,
    pub scavenger: ScavengerTuning,
    pub sprinter: SprinterTuning,
}
