//! Entity value types: player, echoes, obstacles and orbs

use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridPos};

/// Identifier for entities that live in the scene (orbs are keyed by cell instead)
pub type EntityId = u32;

/// Entity id reserved for the player
pub const PLAYER_ID: EntityId = 0;

/// Closed set of entity kinds reported to the render sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Echo,
    StaticObstacle,
    KineticObstacle,
    Orb(OrbKind),
}

/// The player-controlled head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: GridPos,
    /// Position before the last move attempt (interpolation hint)
    pub prev: GridPos,
    /// Recent positions, newest first (cosmetic)
    pub tail: Vec<GridPos>,
}

impl Player {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            prev: pos,
            tail: Vec::new(),
        }
    }

    /// Attempt a single-cell move. Returns false if the target cell is blocked.
    ///
    /// The tail is pushed either way so a blocked move leaves no gap.
    pub fn try_move(
        &mut self,
        dir: Direction,
        tail_len: usize,
        passable: impl Fn(GridPos) -> bool,
    ) -> bool {
        let candidate = self.pos.step(dir);
        self.prev = self.pos;
        let moved = passable(candidate);
        if moved {
            self.pos = candidate;
        }
        self.push_tail(tail_len);
        moved
    }

    fn push_tail(&mut self, limit: usize) {
        self.tail.insert(0, self.prev);
        self.tail.truncate(limit);
    }
}

/// A delayed replay of a slice of the player's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub id: EntityId,
    pub pos: GridPos,
    pub prev: GridPos,
    path: Vec<GridPos>,
    cursor: usize,
}

impl Echo {
    /// Create an echo replaying `path` (oldest first). Panics on an empty path.
    pub fn new(id: EntityId, path: Vec<GridPos>) -> Self {
        assert!(!path.is_empty(), "echo path must not be empty");
        let start = path[0];
        Self {
            id,
            pos: start,
            prev: start,
            path,
            cursor: 0,
        }
    }

    pub fn path(&self) -> &[GridPos] {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Step along the recorded path, clamping to its last cell
    pub fn advance(&mut self) -> GridPos {
        self.prev = self.pos;
        self.pos = match self.path.get(self.cursor) {
            Some(p) => *p,
            None => self.path[self.path.len() - 1],
        };
        if self.cursor < self.path.len() {
            self.cursor += 1;
        }
        debug_assert!(self.cursor <= self.path.len());
        self.pos
    }

    /// True once every recorded cell has been replayed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.path.len()
    }
}

/// Obstacle variants; both answer the same occupancy query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstacle {
    Static {
        id: EntityId,
        pos: GridPos,
    },
    Kinetic {
        id: EntityId,
        path: Vec<GridPos>,
        index: usize,
    },
}

impl Obstacle {
    pub fn fixed(id: EntityId, pos: GridPos) -> Self {
        Obstacle::Static { id, pos }
    }

    /// Kinetic obstacle starting at the first cell of a cyclic path
    pub fn kinetic(id: EntityId, path: Vec<GridPos>) -> Self {
        assert!(!path.is_empty(), "kinetic path must not be empty");
        Obstacle::Kinetic { id, path, index: 0 }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Obstacle::Static { id, .. } | Obstacle::Kinetic { id, .. } => *id,
        }
    }

    /// The cell currently blocked by this obstacle
    pub fn cell(&self) -> GridPos {
        match self {
            Obstacle::Static { pos, .. } => *pos,
            Obstacle::Kinetic { path, index, .. } => path[*index],
        }
    }

    #[inline]
    pub fn occupies(&self, p: GridPos) -> bool {
        self.cell() == p
    }

    pub fn is_kinetic(&self) -> bool {
        matches!(self, Obstacle::Kinetic { .. })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Obstacle::Static { .. } => EntityKind::StaticObstacle,
            Obstacle::Kinetic { .. } => EntityKind::KineticObstacle,
        }
    }

    /// Move a kinetic obstacle one step along its cycle. No-op for static ones.
    pub fn advance(&mut self) {
        if let Obstacle::Kinetic { path, index, .. } = self {
            *index = (*index + 1) % path.len();
        }
    }
}

/// Orb variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbKind {
    White,
    Gold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_move_keeps_position_and_pushes_tail() {
        let mut player = Player::new(GridPos::new(3, 12));
        let moved = player.try_move(Direction::Up, 6, |_| false);
        assert!(!moved);
        assert_eq!(player.pos, GridPos::new(3, 12));
        assert_eq!(player.prev, GridPos::new(3, 12));
        assert_eq!(player.tail, vec![GridPos::new(3, 12)]);
    }

    #[test]
    fn test_tail_is_capped() {
        let mut player = Player::new(GridPos::new(0, 0));
        for _ in 0..10 {
            player.try_move(Direction::Right, 6, |_| true);
        }
        assert_eq!(player.pos, GridPos::new(10, 0));
        assert_eq!(player.tail.len(), 6);
        assert_eq!(player.tail[0], GridPos::new(9, 0));
        assert_eq!(player.tail[5], GridPos::new(4, 0));
    }

    #[test]
    fn test_echo_replays_then_exhausts() {
        let path = vec![GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(2, 0)];
        let mut echo = Echo::new(7, path);
        assert_eq!(echo.advance(), GridPos::new(0, 0));
        assert_eq!(echo.advance(), GridPos::new(1, 0));
        assert!(!echo.is_exhausted());
        assert_eq!(echo.advance(), GridPos::new(2, 0));
        assert!(echo.is_exhausted());
        // Clamped once exhausted
        assert_eq!(echo.advance(), GridPos::new(2, 0));
        assert_eq!(echo.cursor(), 3);
    }

    #[test]
    fn test_kinetic_wraps() {
        let path = vec![GridPos::new(1, 1), GridPos::new(2, 1)];
        let mut ob = Obstacle::kinetic(1, path);
        ob.advance();
        assert_eq!(ob.cell(), GridPos::new(2, 1));
        ob.advance();
        assert_eq!(ob.cell(), GridPos::new(1, 1));

        let mut fixed = Obstacle::fixed(2, GridPos::new(4, 4));
        fixed.advance();
        assert!(fixed.occupies(GridPos::new(4, 4)));
    }
}
