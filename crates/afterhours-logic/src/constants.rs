//! Default tuning constants: grid sizes, footprints, resolver probes and timers.
//!
//! Everything here is a default for a serde-tunable field elsewhere; none of
//! these values are load-bearing invariants.

pub mod nav {
    /// Side length of a navigation grid cell in world units.
    pub const CELL_SIZE: f32 = 20.0;
    /// Agent collision square side length.
    pub const AGENT_SIZE: f32 = 38.0;
    /// Player collision square side length.
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Thickness of generated room walls.
    pub const WALL_THICKNESS: f32 = 20.0;
}

pub mod direct {
    /// Distance under which the resolver reports "already there".
    pub const ARRIVE_RADIUS: f32 = 5.0;
    /// Spacing of line-of-sight samples.
    pub const SAMPLE_STEP: f32 = 20.0;
    /// Half-size of the square probed at each sample.
    pub const PROBE_HALF: f32 = 15.0;
    /// How far ahead each fallback direction is probed.
    pub const PROBE_DISTANCE: f32 = 50.0;
    /// Weight of target alignment against distance reduction.
    pub const ALIGNMENT_WEIGHT: f32 = 100.0;
}

pub mod follow {
    /// Planned-target drift that forces a new search.
    pub const REPATH_DISTANCE: f32 = 40.0;
    /// Waypoint arrival radius, in multiples of this tick's step length.
    pub const ARRIVE_STEPS: f32 = 2.0;
}

pub mod timers {
    pub const GUARDIAN_ACTIVATION: f32 = 8.0;
    pub const PURSUER_ACTIVATION: f32 = 30.0;
    pub const MONITOR_ACTIVATION: f32 = 10.0;
    pub const SCAVENGER_ACTIVATION: f32 = 15.0;
    pub const SPRINTER_ACTIVATION: f32 = 20.0;

    /// Seconds of continuous depletion before the guardian turns hostile.
    pub const DEPLETION_DEBOUNCE: f32 = 10.0;
    /// Seconds the pursuer spends eating a handed-off item.
    pub const EATING_DURATION: f32 = 10.0;
    /// Seconds between scavenger snack runs.
    pub const SNACK_INTERVAL: f32 = 45.0;
    pub const SPRINT_DURATION: f32 = 3.0;
    pub const SPRINT_COOLDOWN: f32 = 10.0;
}

pub mod idle {
    /// Idle seconds before the monitor starts chasing.
    pub const CHASE_AFTER: f32 = 30.0;
    /// Idle seconds below which a chasing monitor calms down.
    pub const RELEASE_BELOW: f32 = 20.0;
    /// Idle seconds gained per second of unproductive play.
    pub const ACCRUAL_RATE: f32 = 1.0;
    /// Idle seconds shed per second of productive play.
    pub const DECAY_RATE: f32 = 4.0;
}
