//! Game state and core simulation types
//!
//! Everything needed to continue a run deterministically lives here,
//! including the RNG cursor.

use std::collections::BTreeMap;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Echo, EntityId, EntityKind, Obstacle, OrbKind, PLAYER_ID, Player};
use super::events::{EntityEvent, GameEvent};
use super::grid::{Grid, GridPos};
use super::history::HistoryBuffer;
use super::score::ScoreState;
use super::worldgen;
use crate::config::SimConfig;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start request
    Idle,
    /// Ticks are being simulated
    Playing,
    /// Reserved; nothing enters this phase yet
    Paused,
    /// Run ended; waiting for acknowledgement or a new start
    Over,
}

/// Serializable RNG cursor.
///
/// Each draw site takes a fresh generator for `(seed, stream)` and advances
/// `stream`, so restoring this struct reproduces every later draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Orb map stored as a list so it survives formats with string-only keys
mod orb_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::sim::entity::OrbKind;
    use crate::sim::grid::GridPos;

    pub fn serialize<S>(orbs: &BTreeMap<GridPos, OrbKind>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries: Vec<(GridPos, OrbKind)> = orbs.iter().map(|(p, k)| (*p, *k)).collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<GridPos, OrbKind>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<(GridPos, OrbKind)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    pub grid: Grid,
    pub rng_state: RngState,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub tick: u64,
    /// Current ticks per second (ramps up over the run)
    pub tick_rate: f64,
    pub score: ScoreState,
    pub player: Player,
    /// Live echoes in spawn order
    pub echoes: Vec<Echo>,
    pub obstacles: Vec<Obstacle>,
    /// At most one orb per cell
    #[serde(with = "orb_map")]
    pub orbs: BTreeMap<GridPos, OrbKind>,
    pub history: HistoryBuffer,
    pub next_echo_spawn: u64,
    pub last_orb_spawn: u64,
    pub last_speed_up: u64,
    pub last_bump_tick: Option<u64>,
    /// Events produced since the last drain (not persisted)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a state with a freshly generated world, waiting in `Idle`
    pub fn new(config: SimConfig, seed: u64) -> Self {
        debug_assert!(config.validate().is_ok(), "config must be validated first");
        let grid = Grid::new(config.grid_width, config.grid_height);
        let spawn = grid.spawn_cell();
        let mut state = Self {
            grid,
            rng_state: RngState::new(seed),
            phase: GamePhase::Idle,
            tick: 0,
            tick_rate: config.tick_base,
            score: ScoreState::default(),
            player: Player::new(spawn),
            echoes: Vec::new(),
            obstacles: Vec::new(),
            orbs: BTreeMap::new(),
            history: HistoryBuffer::new(config.history_capacity()),
            next_echo_spawn: config.echo_delay as u64,
            last_orb_spawn: 0,
            last_speed_up: 0,
            last_bump_tick: None,
            events: Vec::new(),
            next_id: PLAYER_ID + 1,
            config,
        };
        state.rebuild();
        state
    }

    /// Reset every counter and generate a new world from the ongoing RNG stream
    pub fn rebuild(&mut self) {
        self.tick = 0;
        self.tick_rate = self.config.tick_base;
        self.score = ScoreState::default();
        self.echoes.clear();
        self.obstacles.clear();
        self.orbs.clear();
        self.history.clear();
        self.next_echo_spawn = self.config.echo_delay as u64;
        self.last_orb_spawn = 0;
        self.last_speed_up = 0;
        self.last_bump_tick = None;
        self.next_id = PLAYER_ID + 1;
        self.player = Player::new(self.grid.spawn_cell());

        self.push_event(EntityEvent::Cleared);
        self.push_event(EntityEvent::Spawned {
            id: PLAYER_ID,
            kind: EntityKind::Player,
            at: self.player.pos,
        });

        let mut rng = self.rng_state.next_rng();
        worldgen::build_world(self, &mut rng);
        log::info!(
            "World built: {} obstacles, {} orbs (seed {}, stream {})",
            self.obstacles.len(),
            self.orbs.len(),
            self.rng_state.seed,
            self.rng_state.stream
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: impl Into<GameEvent>) {
        self.events.push(event.into());
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Passability against the current obstacle layout
    pub fn passable(&self, p: GridPos) -> bool {
        self.grid.passable(p, &self.obstacles)
    }

    /// Seconds of game time, measured at the base tick rate
    pub fn elapsed_secs(&self) -> f64 {
        self.tick as f64 / self.config.tick_base
    }

    /// Wall-clock length of one tick at the current rate
    pub fn tick_interval(&self) -> f64 {
        assert!(self.tick_rate > 0.0, "tick rate must stay positive");
        1.0 / self.tick_rate
    }

    /// Check the invariants the constructors normally guarantee.
    ///
    /// Deserialized states bypass those constructors, so loaders call this
    /// before handing a state to [`tick`](super::tick()).
    pub fn check_consistency(&self) -> Result<(), String> {
        let config = &self.config;
        if self.grid != Grid::new(config.grid_width, config.grid_height) {
            return Err("grid does not match config".into());
        }
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 || self.tick_rate > config.max_tick_rate {
            return Err(format!("tick rate {} out of range", self.tick_rate));
        }
        if self.history.capacity() == 0 || self.history.len() > self.history.capacity() {
            return Err("history buffer is malformed".into());
        }

        let in_bounds = |p: &GridPos| self.grid.in_bounds(*p);
        if !in_bounds(&self.player.pos) {
            return Err("player is off the grid".into());
        }
        for echo in &self.echoes {
            if echo.path().is_empty() || echo.cursor() > echo.path().len() {
                return Err(format!("echo {} has a broken path cursor", echo.id));
            }
            if !in_bounds(&echo.pos) || !echo.path().iter().all(in_bounds) {
                return Err(format!("echo {} is off the grid", echo.id));
            }
        }
        for ob in &self.obstacles {
            match ob {
                Obstacle::Static { id, pos } if !in_bounds(pos) => {
                    return Err(format!("obstacle {id} is off the grid"));
                }
                Obstacle::Kinetic { id, path, index } => {
                    if *index >= path.len() {
                        return Err(format!("obstacle {id} has a broken path index"));
                    }
                    if !path.iter().all(in_bounds) {
                        return Err(format!("obstacle {id} is off the grid"));
                    }
                }
                Obstacle::Static { .. } => {}
            }
        }
        if !self.orbs.keys().all(in_bounds) {
            return Err("orb is off the grid".into());
        }
        Ok(())
    }

    pub fn kinetic_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.is_kinetic()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_with_world() {
        let state = GameState::new(SimConfig::default(), 42);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.tick, 0);
        assert_eq!(state.player.pos, GridPos::new(3, 12));
        assert!(state.obstacles.len() >= 8);
        assert!(state.orbs.len() <= 3);
        assert_eq!(state.next_echo_spawn, 30);
        assert!(matches!(
            state.events.first(),
            Some(GameEvent::Entity(EntityEvent::Cleared))
        ));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(SimConfig::default(), 7);
        let b = GameState::new(SimConfig::default(), 7);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.orbs, b.orbs);
    }

    #[test]
    fn test_rebuild_resets_counters_and_advances_stream() {
        let mut state = GameState::new(SimConfig::default(), 7);
        let stream = state.rng_state.stream;
        state.tick = 500;
        state.tick_rate = 18.0;
        state.score.score = 900;
        state.next_echo_spawn = 510;
        state.rebuild();
        assert!(state.rng_state.stream > stream);
        assert_eq!(state.tick, 0);
        assert_eq!(state.tick_rate, 10.0);
        assert_eq!(state.score, ScoreState::default());
        assert_eq!(state.next_echo_spawn, 30);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_fresh_state_is_consistent() {
        let mut state = GameState::new(SimConfig::default(), 11);
        assert_eq!(state.check_consistency(), Ok(()));
        state.tick_rate = 0.0;
        assert!(state.check_consistency().is_err());
        state.tick_rate = 10.0;
        state.player.pos = GridPos::new(7, 0);
        assert!(state.check_consistency().is_err());
    }

    #[test]
    fn test_orb_map_serializes_as_list() {
        let state = GameState::new(SimConfig::default(), 3);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.orbs, state.orbs);
        assert!(restored.events.is_empty());
    }
}
