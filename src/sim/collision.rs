//! Per-tick hazard detection
//!
//! Checks run in a fixed order and the first hit ends the run:
//! player vs obstacle, echo vs obstacle, then echo vs player.

use super::entity::{Echo, Obstacle};
use super::events::GameOverReason;
use super::grid::GridPos;

fn hits_obstacle(p: GridPos, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| o.occupies(p))
}

/// Returns the terminal reason, if any hazard is hit this tick
pub fn check_hazards(
    player: GridPos,
    echoes: &[Echo],
    obstacles: &[Obstacle],
) -> Option<GameOverReason> {
    if hits_obstacle(player, obstacles) {
        return Some(GameOverReason::HitObstacle);
    }
    if echoes.iter().any(|e| hits_obstacle(e.pos, obstacles)) {
        return Some(GameOverReason::EchoHitObstacle);
    }
    if echoes.iter().any(|e| e.pos == player) {
        return Some(GameOverReason::CollidedWithEcho);
    }
    None
}
