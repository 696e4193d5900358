//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only; wall-clock time never reaches this module
//! - Seeded RNG only
//! - Stable iteration order (spawn order for echoes, cell order for orbs)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod events;
pub mod fusion;
pub mod grid;
pub mod history;
pub mod score;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use collision::check_hazards;
pub use entity::{Echo, EntityId, EntityKind, Obstacle, OrbKind, PLAYER_ID, Player};
pub use events::{Cue, EntityEvent, GameEvent, GameOverReason};
pub use grid::{Direction, Grid, GridPos, manhattan};
pub use history::HistoryBuffer;
pub use score::ScoreState;
pub use state::{GamePhase, GameState, RngState};
pub use tick::{TickInput, TickOutcome, tick};
