//! Events emitted by the simulation during a tick
//!
//! The simulation never calls out to render/audio/HUD directly; it appends
//! events to `GameState::events` and the engine drains them after each tick.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, OrbKind};
use super::grid::GridPos;

/// Named audio/haptic cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    EatWhite,
    EatGold,
    EchoSpawn,
    EchoFuse,
    BumpWall,
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    HitObstacle,
    EchoHitObstacle,
    CollidedWithEcho,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::HitObstacle => "hit obstacle",
            GameOverReason::EchoHitObstacle => "echo hit obstacle",
            GameOverReason::CollidedWithEcho => "collided with echo",
        }
    }
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scene-graph changes for the render sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityEvent {
    /// All scene nodes should be dropped (world rebuild)
    Cleared,
    Spawned {
        id: EntityId,
        kind: EntityKind,
        at: GridPos,
    },
    Moved {
        id: EntityId,
        kind: EntityKind,
        from: GridPos,
        to: GridPos,
    },
    Despawned {
        id: EntityId,
        kind: EntityKind,
    },
    OrbPlaced {
        at: GridPos,
        kind: OrbKind,
    },
    OrbUpgraded {
        at: GridPos,
    },
    OrbCollected {
        at: GridPos,
        kind: OrbKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Entity(EntityEvent),
    Cue(Cue),
    /// A group of co-located echoes merged
    Fused { at: GridPos, echoes: usize },
    /// Difficulty ramp raised the tick rate
    TickRateChanged { rate: f64 },
    GameOver { reason: GameOverReason },
}

impl From<EntityEvent> for GameEvent {
    fn from(e: EntityEvent) -> Self {
        GameEvent::Entity(e)
    }
}

impl From<Cue> for GameEvent {
    fn from(c: Cue) -> Self {
        GameEvent::Cue(c)
    }
}
