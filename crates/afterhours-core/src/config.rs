//! Simulation configuration.
//!
//! Everything is serde-tunable with defaults, so a config file only needs
//! the fields it overrides:
//!
//! ```
//! use afterhours_core::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "seed": 7, "agents": { "pursuer": { "chase_speed": 80.0 } } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.agents.pursuer.chase_speed, 80.0);
//! assert_eq!(config.agents.pursuer.activation, 30.0);
//! ```

use afterhours_logic::constants::{idle, nav};
use afterhours_logic::direct::DirectParams;
use afterhours_logic::follow::FollowParams;
use afterhours_logic::signals::IdleMeter;
use afterhours_logic::tuning::KindTuning;
use serde::{Deserialize, Serialize};

/// Grid and footprint sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub cell_size: f32,
    pub agent_size: f32,
    pub player_size: f32,
    pub wall_thickness: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            cell_size: nav::CELL_SIZE,
            agent_size: nav::AGENT_SIZE,
            player_size: nav::PLAYER_SIZE,
            wall_thickness: nav::WALL_THICKNESS,
        }
    }
}

impl NavConfig {
    /// Obstacle inflation applied when building grids: half an agent.
    pub fn clearance(&self) -> f32 {
        self.agent_size / 2.0
    }
}

/// Idle meter rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub accrual_rate: f32,
    pub decay_rate: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            accrual_rate: idle::ACCRUAL_RATE,
            decay_rate: idle::DECAY_RATE,
        }
    }
}

impl IdleConfig {
    pub fn meter(&self) -> IdleMeter {
        IdleMeter {
            value: 0.0,
            accrual_rate: self.accrual_rate,
            decay_rate: self.decay_rate,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the simulation's `StdRng`.
    pub seed: u64,
    pub nav: NavConfig,
    pub direct: DirectParams,
    pub follow: FollowParams,
    pub idle: IdleConfig,
    pub agents: KindTuning,
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterhours_logic::follow::NavStrategy;

    #[test]
    fn test_empty_json_is_default() {
        let config = SimConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_nested_override() {
        let config = SimConfig::from_json_str(
            r#"{ "nav": { "cell_size": 10.0 }, "agents": { "guardian": { "nav": { "strategy": "Direct" } } } }"#,
        )
        .unwrap();
        assert_eq!(config.nav.cell_size, 10.0);
        assert_eq!(config.nav.agent_size, 38.0);
        assert_eq!(config.agents.guardian.nav.strategy, NavStrategy::Direct);
        assert_eq!(config.agents.guardian.chase_speed, 85.0);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = SimConfig::default();
        config.seed = 99;
        config.idle.decay_rate = 2.0;
        let json = config.to_json_string().unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(SimConfig::from_json_str("{ \"seed\": \"x\" }").is_err());
    }

    #[test]
    fn test_clearance_is_half_agent() {
        assert_eq!(NavConfig::default().clearance(), 19.0);
    }
}
