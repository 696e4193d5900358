//! Difficulty ramp: faster ticks and more kinetic obstacles over time

use super::events::{EntityEvent, GameEvent};
use super::state::GameState;
use super::worldgen;

/// Next tick rate after one ramp step
#[inline]
pub fn ramped_rate(rate: f64, step: f64, max: f64) -> f64 {
    (rate * step).min(max)
}

/// Every `speed_step` ticks: speed up and try to add a kinetic obstacle.
/// Returns true if a ramp happened this tick.
pub fn maybe_ramp(state: &mut GameState) -> bool {
    if state.tick - state.last_speed_up < state.config.speed_step {
        return false;
    }
    state.last_speed_up = state.tick;
    state.tick_rate = ramped_rate(
        state.tick_rate,
        state.config.tick_rate_step,
        state.config.max_tick_rate,
    );
    debug_assert!(state.tick_rate > 0.0);
    state.push_event(GameEvent::TickRateChanged {
        rate: state.tick_rate,
    });
    log::debug!("Tick {}: rate now {:.2}/s", state.tick, state.tick_rate);

    let mut rng = state.rng_state.next_rng();
    worldgen::try_add_kinetic(state, &mut rng);
    true
}

/// Advance every kinetic obstacle on the shared `kinetic_period` clock
pub fn advance_kinetics(state: &mut GameState) {
    if state.tick % state.config.kinetic_period != 0 {
        return;
    }
    let mut moves = Vec::new();
    for ob in state.obstacles.iter_mut().filter(|o| o.is_kinetic()) {
        let from = ob.cell();
        ob.advance();
        if ob.cell() != from {
            moves.push((ob.id(), ob.kind(), from, ob.cell()));
        }
    }
    for (id, kind, from, to) in moves {
        state.push_event(EntityEvent::Moved { id, kind, from, to });
    }
}
