//! Score, timed multiplier and echo-peak tracking

use serde::{Deserialize, Serialize};

pub const MULTIPLIER_MIN: f64 = 1.0;
pub const MULTIPLIER_MAX: f64 = 4.0;
pub const MULTIPLIER_STEP: f64 = 0.5;

/// Points for a white orb
pub const WHITE_ORB_POINTS: u64 = 10;
/// Base points for a gold orb (scaled by the multiplier)
pub const GOLD_ORB_BASE: f64 = 30.0;
/// Points for each fusion group
pub const FUSION_POINTS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub multiplier: f64,
    /// Tick at which the multiplier falls back to 1.0
    pub multiplier_expiry: Option<u64>,
    /// Highest number of echoes alive at once
    pub echo_peak: usize,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            multiplier: MULTIPLIER_MIN,
            multiplier_expiry: None,
            echo_peak: 0,
        }
    }
}

impl ScoreState {
    /// Raise the multiplier one step and restart its window
    pub fn bump_multiplier(&mut self, tick: u64, window: u64) {
        self.multiplier = (self.multiplier + MULTIPLIER_STEP).min(MULTIPLIER_MAX);
        self.multiplier_expiry = Some(tick + window);
    }

    pub fn collect_white(&mut self) -> u64 {
        self.score += WHITE_ORB_POINTS;
        WHITE_ORB_POINTS
    }

    /// Award a gold orb at the current multiplier, then bump it
    pub fn collect_gold(&mut self, tick: u64, window: u64) -> u64 {
        let points = (GOLD_ORB_BASE * self.multiplier).floor() as u64;
        self.score += points;
        self.bump_multiplier(tick, window);
        points
    }

    pub fn award_fusion(&mut self, tick: u64, window: u64) {
        self.score += FUSION_POINTS;
        self.bump_multiplier(tick, window);
    }

    /// Reset the multiplier once its window has elapsed. Returns true if it expired.
    pub fn expire_multiplier(&mut self, tick: u64) -> bool {
        match self.multiplier_expiry {
            Some(at) if tick >= at => {
                self.multiplier = MULTIPLIER_MIN;
                self.multiplier_expiry = None;
                true
            }
            _ => false,
        }
    }

    pub fn observe_echo_count(&mut self, live: usize) {
        self.echo_peak = self.echo_peak.max(live);
    }
}
