//! Echo Trail - A grid arcade game where your past moves come back to haunt you
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, echoes, fusion, scoring, game state)
//! - `engine`: Fixed-timestep driver and run lifecycle
//! - `services`: Sink traits for render, HUD, game-over and audio
//! - `audio`: Cue naming and volume mixing
//! - `platform`: Frame clock and input folding
//! - `render`: Grid to presentation-space projection
//! - `persistence`: Versioned save/load
//! - `config`: Data-driven game tuning

pub mod audio;
pub mod config;
pub mod engine;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod services;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use engine::TickEngine;
pub use persistence::PersistError;
pub use services::Services;
