//! Simulation tunables
//!
//! Defaults reproduce the classic 7×13 board. Any field may be overridden
//! from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::history::HistoryBuffer;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Upper bound on recorded player history (ticks)
pub const MAX_HISTORY: usize = 1 << 20;

/// All simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Grid ===
    pub grid_width: i32,
    pub grid_height: i32,

    // === Clock ===
    /// Starting tick rate (ticks/second); also the divisor for elapsed time
    pub tick_base: f64,
    /// Ceiling for the ramped tick rate
    pub max_tick_rate: f64,
    /// Multiplicative tick-rate step per ramp
    pub tick_rate_step: f64,
    /// Longest wall-clock delta accepted per update (seconds)
    pub max_frame_dt: f64,

    // === Echoes ===
    /// Ticks between echo spawns, and the length of each echo's path
    pub echo_delay: usize,
    pub echo_limit: usize,

    // === Orbs ===
    pub ball_interval: u64,
    pub ball_cap: usize,
    pub initial_orbs: usize,
    pub orb_attempts: usize,

    // === Difficulty ===
    pub speed_step: u64,
    pub kinetic_period: u64,
    pub max_kinetic: usize,
    pub kinetic_attempts: usize,

    // === World generation ===
    pub static_obstacles_min: usize,
    /// Extra obstacles drawn uniformly from 0..=this
    pub static_obstacles_extra: usize,
    pub static_attempts: usize,

    // === Scoring & feel ===
    pub multiplier_window: u64,
    pub bump_cooldown: u64,
    pub tail_length: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 7,
            grid_height: 13,

            tick_base: 10.0,
            max_tick_rate: 20.0,
            tick_rate_step: 1.08,
            max_frame_dt: 0.25,

            echo_delay: 30,
            echo_limit: 8,

            ball_interval: 40,
            ball_cap: 7,
            initial_orbs: 3,
            orb_attempts: 50,

            speed_step: 100,
            kinetic_period: 5,
            max_kinetic: 4,
            kinetic_attempts: 8,

            static_obstacles_min: 8,
            static_obstacles_extra: 5,
            static_attempts: 200,

            multiplier_window: 50,
            bump_cooldown: 5,
            tail_length: 6,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        // A kinetic corridor needs at least one column of margin on each side
        if self.grid_width < 5 {
            return fail("grid_width must be at least 5");
        }
        // World generation leaves the bottom three rows free
        if self.grid_height < 4 {
            return fail("grid_height must be at least 4");
        }
        if !self.tick_base.is_finite() || self.tick_base <= 0.0 {
            return fail("tick_base must be positive");
        }
        if !self.max_tick_rate.is_finite() || self.max_tick_rate < self.tick_base {
            return fail("max_tick_rate must be >= tick_base");
        }
        if self.tick_rate_step.is_nan() || self.tick_rate_step < 1.0 {
            return fail("tick_rate_step must be >= 1.0");
        }
        if self.max_frame_dt.is_nan() || self.max_frame_dt <= 0.0 {
            return fail("max_frame_dt must be positive");
        }
        if self.echo_delay == 0 || self.echo_limit == 0 {
            return fail("echo_delay and echo_limit must be positive");
        }
        let history = self
            .echo_delay
            .checked_mul(self.echo_limit)
            .and_then(|n| n.checked_add(60));
        if history.is_none_or(|n| n > MAX_HISTORY) {
            return fail("echo_delay * echo_limit is too large");
        }
        if self.ball_interval == 0 || self.speed_step == 0 || self.kinetic_period == 0 {
            return fail("ball_interval, speed_step and kinetic_period must be positive");
        }
        Ok(())
    }

    /// Length at which player history starts evicting
    pub fn history_capacity(&self) -> usize {
        HistoryBuffer::capacity_for(self.echo_delay, self.echo_limit)
    }
}
