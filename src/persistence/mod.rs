//! Save/load of a running game
//!
//! A save is a versioned JSON envelope around the full [`GameState`],
//! RNG cursor included, so a restored run continues exactly where it left off.
//! The per-tick event log is transient and never saved.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::sim::GameState;

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("saved config is invalid: {0}")]
    Config(#[from] ConfigError),
    #[error("saved state is inconsistent: {0}")]
    InvalidState(String),
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct SaveEnvelope<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct SaveHeader {
    version: u32,
}

#[derive(Deserialize)]
struct LoadedEnvelope {
    state: GameState,
}

pub fn save_to_string(state: &GameState) -> Result<String, PersistError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        state,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a save, checking the version before touching the state payload
pub fn load_from_str(json: &str) -> Result<GameState, PersistError> {
    let header: SaveHeader = serde_json::from_str(json)?;
    if header.version != SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: header.version,
        });
    }
    let loaded: LoadedEnvelope = serde_json::from_str(json)?;
    loaded.state.config.validate()?;
    loaded
        .state
        .check_consistency()
        .map_err(PersistError::InvalidState)?;
    Ok(loaded.state)
}

pub fn save_to_file(state: &GameState, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let json = save_to_string(state)?;
    std::fs::write(path.as_ref(), json)?;
    log::info!("Saved tick {} to {}", state.tick, path.as_ref().display());
    Ok(())
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GameState, PersistError> {
    let json = std::fs::read_to_string(path)?;
    load_from_str(&json)
}
