//! Procedural placement of obstacles and orbs
//!
//! Every placement is attempt-bounded; running out of attempts is a silent
//! skip that leaves score, tick and phase untouched.

use rand::Rng;

use super::entity::{EntityKind, Obstacle, OrbKind};
use super::events::EntityEvent;
use super::grid::GridPos;
use super::state::GameState;

/// Place static obstacles and the opening orbs.
///
/// Obstacles stay out of the bottom three rows and are never stacked so that
/// a cell is boxed in from above and below.
pub fn build_world<R: Rng>(state: &mut GameState, rng: &mut R) {
    let config = &state.config;
    let (w, h) = (state.grid.width, state.grid.height);
    let spawn = state.grid.spawn_cell();
    let target = config.static_obstacles_min + rng.random_range(0..=config.static_obstacles_extra);
    let max_attempts = config.static_attempts;
    let initial_orbs = config.initial_orbs;

    let mut cells: Vec<GridPos> = Vec::with_capacity(target);
    let mut attempts = 0;
    while cells.len() < target && attempts < max_attempts {
        attempts += 1;
        let p = GridPos::new(rng.random_range(0..w), rng.random_range(0..h - 3));
        if p == spawn || cells.contains(&p) {
            continue;
        }
        if p.y > 0
            && p.y < h - 1
            && cells.contains(&GridPos::new(p.x, p.y - 1))
            && cells.contains(&GridPos::new(p.x, p.y + 1))
        {
            continue;
        }
        cells.push(p);
    }
    if cells.len() < target {
        log::trace!("Placed {}/{} static obstacles", cells.len(), target);
    }

    for p in cells {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::fixed(id, p));
        state.push_event(EntityEvent::Spawned {
            id,
            kind: EntityKind::StaticObstacle,
            at: p,
        });
    }

    for _ in 0..initial_orbs {
        place_random_orb(state, rng, OrbKind::White);
    }
}

/// Drop an orb on a random free, passable cell away from the player.
/// Returns the chosen cell, or None if every attempt collided.
pub fn place_random_orb<R: Rng>(state: &mut GameState, rng: &mut R, kind: OrbKind) -> Option<GridPos> {
    let (w, h) = (state.grid.width, state.grid.height);
    for _ in 0..state.config.orb_attempts {
        let p = GridPos::new(rng.random_range(0..w), rng.random_range(0..h));
        if !state.orbs.contains_key(&p) && state.passable(p) && p != state.player.pos {
            state.orbs.insert(p, kind);
            state.push_event(EntityEvent::OrbPlaced { at: p, kind });
            return Some(p);
        }
    }
    log::trace!("No free cell for orb after {} attempts", state.config.orb_attempts);
    None
}

/// Back-and-forth corridor along row `y` starting at column `x0`.
///
/// `len` cells forward, then back without repeating either end, so the
/// cycle length is `2 * len - 2`.
pub fn corridor_path(x0: i32, y: i32, len: i32) -> Vec<GridPos> {
    let forward = (x0..x0 + len).map(|x| GridPos::new(x, y));
    let back = (x0 + 1..x0 + len - 1).rev().map(|x| GridPos::new(x, y));
    forward.chain(back).collect()
}

/// Try to add one kinetic obstacle, respecting the concurrent cap.
///
/// Corridors never cover the spawn cell, the player or a static obstacle.
pub fn try_add_kinetic<R: Rng>(state: &mut GameState, rng: &mut R) -> Option<Obstacle> {
    if state.kinetic_count() >= state.config.max_kinetic {
        return None;
    }
    let (w, h) = (state.grid.width, state.grid.height);
    let spawn = state.grid.spawn_cell();

    for _ in 0..state.config.kinetic_attempts {
        let y = rng.random_range(0..h - 3);
        let len = (3 + rng.random_range(0..=3)).clamp(3, w - 2);
        let span = w - len - 1;
        if span <= 0 {
            continue;
        }
        let x0 = 1 + rng.random_range(0..span);
        let path = corridor_path(x0, y, len);

        let blocked = path.iter().any(|p| {
            *p == spawn
                || *p == state.player.pos
                || state
                    .obstacles
                    .iter()
                    .any(|o| !o.is_kinetic() && o.occupies(*p))
        });
        if blocked {
            continue;
        }

        let id = state.next_entity_id();
        let obstacle = Obstacle::kinetic(id, path);
        state.push_event(EntityEvent::Spawned {
            id,
            kind: EntityKind::KineticObstacle,
            at: obstacle.cell(),
        });
        state.obstacles.push(obstacle.clone());
        log::debug!("Kinetic obstacle {} added at row {}", id, y);
        return Some(obstacle);
    }
    log::trace!("Kinetic obstacle placement failed this cycle");
    None
}
