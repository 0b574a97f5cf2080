//! Shared world resources that drive agent behavior.
//!
//! These are the only mutable values agents and the player both touch:
//! the stock counter, the player's carried item, and the idle meter.

use serde::{Deserialize, Serialize};

use crate::constants::idle;

/// Idle-duration meter.
///
/// Accrues while the player is unproductive, drains faster while they are
/// productive. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleMeter {
    pub value: f32,
    pub accrual_rate: f32,
    pub decay_rate: f32,
}

impl Default for IdleMeter {
    fn default() -> Self {
        Self {
            value: 0.0,
            accrual_rate: idle::ACCRUAL_RATE,
            decay_rate: idle::DECAY_RATE,
        }
    }
}

impl IdleMeter {
    pub fn update(&mut self, dt: f32, productive: bool) {
        if productive {
            self.value = (self.value - self.decay_rate * dt).max(0.0);
        } else {
            self.value += self.accrual_rate * dt;
        }
    }
}

/// World state the state machines read (and, on exchange, write).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSignals {
    /// Snack stock held by the player.
    pub stock: u32,
    /// Whether the player is carrying the pursuer's item.
    pub player_has_item: bool,
    /// Whether the player is doing productive work this tick.
    pub productive: bool,
    pub idle: IdleMeter,
}

impl Default for WorldSignals {
    fn default() -> Self {
        Self {
            stock: 3,
            player_has_item: false,
            productive: false,
            idle: IdleMeter::default(),
        }
    }
}

impl WorldSignals {
    pub fn depleted(&self) -> bool {
        self.stock == 0
    }

    /// Take one unit of stock. Returns `false` if there was nothing to take.
    pub fn take_stock(&mut self) -> bool {
        if self.stock > 0 {
            self.stock -= 1;
            true
        } else {
            false
        }
    }

    /// Advance time-based signals by one tick.
    pub fn tick(&mut self, dt: f32) {
        self.idle.update(dt, self.productive);
    }
}
