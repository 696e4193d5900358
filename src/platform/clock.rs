//! Fixed-timestep accumulator
//!
//! Frame deltas are banked and drained in whole ticks, so the number of ticks
//! depends only on elapsed time, never on frame rate.

/// Banked wall-clock time awaiting conversion into ticks
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    accumulator: f64,
    max_frame_dt: f64,
}

impl FixedStep {
    pub fn new(max_frame_dt: f64) -> Self {
        assert!(max_frame_dt > 0.0, "max_frame_dt must be positive");
        Self {
            accumulator: 0.0,
            max_frame_dt,
        }
    }

    /// Bank a frame delta, clamped to avoid a spiral of death after a stall
    pub fn accumulate(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt.min(self.max_frame_dt);
        }
    }

    /// Consume one tick of `interval` seconds if enough time is banked.
    ///
    /// Callers pass the interval for the current tick rate on every call.
    pub fn try_consume(&mut self, interval: f64) -> bool {
        assert!(interval > 0.0, "tick interval must be positive");
        if self.accumulator >= interval {
            self.accumulator -= interval;
            true
        } else {
            false
        }
    }

    pub fn banked(&self) -> f64 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_whole_ticks() {
        let mut clock = FixedStep::new(0.25);
        clock.accumulate(0.25);
        let mut ticks = 0;
        while clock.try_consume(0.1) {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert!((clock.banked() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut clock = FixedStep::new(0.25);
        clock.accumulate(0.04);
        assert!(!clock.try_consume(0.1));
        clock.accumulate(0.04);
        clock.accumulate(0.04);
        assert!(clock.try_consume(0.1));
    }

    #[test]
    fn test_clamps_stalls_and_ignores_garbage() {
        let mut clock = FixedStep::new(0.25);
        clock.accumulate(10.0);
        assert_eq!(clock.banked(), 0.25);
        clock.accumulate(-1.0);
        clock.accumulate(f64::NAN);
        assert_eq!(clock.banked(), 0.25);
        clock.reset();
        assert_eq!(clock.banked(), 0.0);
    }
}
