//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one tick in a fixed phase order:
//! move, record history, spawn echoes, replay echoes, fuse, move kinetic
//! obstacles, check hazards, collect orbs, expire the multiplier,
//! replenish orbs, ramp difficulty, then bump the tick counter.

use serde::{Deserialize, Serialize};

use super::collision::check_hazards;
use super::difficulty;
use super::entity::{Echo, EntityKind, OrbKind, PLAYER_ID};
use super::events::{Cue, EntityEvent, GameEvent, GameOverReason};
use super::fusion::resolve_fusions;
use super::grid::Direction;
use super::state::{GamePhase, GameState};
use super::worldgen;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Requested move
    pub direction: Direction,
    /// Forces `Hold` regardless of `direction`
    pub hold: bool,
}

impl TickInput {
    pub fn moving(direction: Direction) -> Self {
        Self {
            direction,
            hold: false,
        }
    }

    /// The command actually applied this tick
    pub fn command(&self) -> Direction {
        if self.hold { Direction::Hold } else { self.direction }
    }
}

/// What happened in one call to [`tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing ran
    Skipped,
    /// Tick completed and the counter advanced
    Advanced,
    /// A hazard ended the run mid-tick; the counter did not advance
    GameOver(GameOverReason),
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.phase != GamePhase::Playing {
        return TickOutcome::Skipped;
    }

    move_player(state, input.command());

    state.history.push(state.player.pos);

    if state.tick == state.next_echo_spawn {
        try_spawn_echo(state);
        // A suppressed spawn is skipped, not retried
        state.next_echo_spawn += state.config.echo_delay as u64;
    }

    advance_echoes(state);
    resolve_fusions(state);
    difficulty::advance_kinetics(state);

    if let Some(reason) = check_hazards(state.player.pos, &state.echoes, &state.obstacles) {
        end_run(state, reason);
        return TickOutcome::GameOver(reason);
    }

    remove_exhausted_echoes(state);
    collect_orb(state);
    state.score.expire_multiplier(state.tick);
    replenish_orbs(state);
    difficulty::maybe_ramp(state);

    state.tick += 1;
    debug_assert!(state.echoes.len() <= state.config.echo_limit);
    TickOutcome::Advanced
}

fn move_player(state: &mut GameState, command: Direction) {
    let grid = state.grid;
    let obstacles = &state.obstacles;
    let moved = state
        .player
        .try_move(command, state.config.tail_length, |p| grid.passable(p, obstacles));

    if moved {
        if state.player.pos != state.player.prev {
            state.push_event(EntityEvent::Moved {
                id: PLAYER_ID,
                kind: EntityKind::Player,
                from: state.player.prev,
                to: state.player.pos,
            });
        }
        return;
    }

    if command == Direction::Hold {
        return;
    }
    let ready = state
        .last_bump_tick
        .is_none_or(|last| state.tick - last >= state.config.bump_cooldown);
    if ready {
        state.last_bump_tick = Some(state.tick);
        state.push_event(Cue::BumpWall);
    }
}

fn try_spawn_echo(state: &mut GameState) {
    let delay = state.config.echo_delay;
    if state.echoes.len() >= state.config.echo_limit {
        log::debug!("Tick {}: echo limit reached, spawn skipped", state.tick);
        return;
    }
    let Some(path) = state.history.recent(delay) else {
        return;
    };

    let id = state.next_entity_id();
    let echo = Echo::new(id, path);
    debug_assert_eq!(echo.path().len(), delay);
    state.push_event(EntityEvent::Spawned {
        id,
        kind: EntityKind::Echo,
        at: echo.pos,
    });
    state.echoes.push(echo);
    state.score.observe_echo_count(state.echoes.len());
    state.push_event(Cue::EchoSpawn);
    log::debug!(
        "Tick {}: echo {} spawned ({} alive)",
        state.tick,
        id,
        state.echoes.len()
    );
}

/// Replay one step for every echo. Exhausted echoes stay until after the
/// hazard checks so their final cell still counts this tick.
fn advance_echoes(state: &mut GameState) {
    let mut events: Vec<GameEvent> = Vec::new();
    for echo in state.echoes.iter_mut().rev() {
        let to = echo.advance();
        if echo.prev != to {
            events.push(
                EntityEvent::Moved {
                    id: echo.id,
                    kind: EntityKind::Echo,
                    from: echo.prev,
                    to,
                }
                .into(),
            );
        }
        if let Some(orb) = state.orbs.get_mut(&to) {
            if *orb == OrbKind::White {
                *orb = OrbKind::Gold;
                events.push(EntityEvent::OrbUpgraded { at: to }.into());
                events.push(Cue::EatWhite.into());
            }
        }
    }
    state.events.extend(events);
}

fn remove_exhausted_echoes(state: &mut GameState) {
    let mut expired = Vec::new();
    state.echoes.retain(|e| {
        if e.is_exhausted() {
            expired.push(e.id);
            false
        } else {
            true
        }
    });
    for id in expired {
        state.push_event(EntityEvent::Despawned {
            id,
            kind: EntityKind::Echo,
        });
    }
}

fn collect_orb(state: &mut GameState) {
    let at = state.player.pos;
    let Some(kind) = state.orbs.remove(&at) else {
        return;
    };
    state.push_event(EntityEvent::OrbCollected { at, kind });
    match kind {
        OrbKind::White => {
            state.score.collect_white();
            state.push_event(Cue::EatWhite);
        }
        OrbKind::Gold => {
            let window = state.config.multiplier_window;
            state.score.collect_gold(state.tick, window);
            state.push_event(Cue::EatGold);
        }
    }
}

fn replenish_orbs(state: &mut GameState) {
    if state.tick - state.last_orb_spawn < state.config.ball_interval {
        return;
    }
    state.last_orb_spawn = state.tick;
    if state.orbs.len() < state.config.ball_cap {
        let mut rng = state.rng_state.next_rng();
        worldgen::place_random_orb(state, &mut rng, OrbKind::White);
    }
}

fn end_run(state: &mut GameState, reason: GameOverReason) {
    state.phase = GamePhase::Over;
    state.push_event(GameEvent::GameOver { reason });
    state.push_event(Cue::GameOver);
    log::info!(
        "Game over at tick {}: {} (score {}, echo peak {})",
        state.tick,
        reason,
        state.score.score,
        state.score.echo_peak
    );
}
