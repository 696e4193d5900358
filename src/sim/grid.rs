//! Grid geometry and the passability predicate
//!
//! Row 0 is the top of the board; the player spawns on the bottom row.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::Obstacle;

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by stepping once in `dir` (may be out of bounds)
    pub fn step(self, dir: Direction) -> Self {
        let d = dir.delta();
        Self::new(self.x + d.x, self.y + d.y)
    }
}

impl From<IVec2> for GridPos {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GridPos> for IVec2 {
    fn from(p: GridPos) -> Self {
        IVec2::new(p.x, p.y)
    }
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: GridPos, b: GridPos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Discrete movement command for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Hold,
}

impl Direction {
    /// Unit step for this direction (zero for `Hold`)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::Hold => IVec2::ZERO,
        }
    }
}

/// Static grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        Self { width, height }
    }

    #[inline]
    pub fn in_bounds(&self, p: GridPos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Spawn cell: bottom row, middle column
    pub fn spawn_cell(&self) -> GridPos {
        GridPos::new(self.width / 2, self.height - 1)
    }

    /// True if `p` is inside the grid and not covered by any obstacle.
    ///
    /// Kinetic obstacles block only their current cell, so this must be asked
    /// again every tick.
    pub fn passable(&self, p: GridPos, obstacles: &[Obstacle]) -> bool {
        self.in_bounds(p) && !obstacles.iter().any(|o| o.occupies(p))
    }

    /// All cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPos::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Obstacle;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(7, 13);
        assert!(grid.in_bounds(GridPos::new(0, 0)));
        assert!(grid.in_bounds(GridPos::new(6, 12)));
        assert!(!grid.in_bounds(GridPos::new(7, 0)));
        assert!(!grid.in_bounds(GridPos::new(0, -1)));
        assert_eq!(grid.cells().count(), 91);
    }

    #[test]
    fn test_passable_respects_kinetic_current_cell() {
        let grid = Grid::new(7, 13);
        let path = vec![GridPos::new(1, 2), GridPos::new(2, 2), GridPos::new(3, 2)];
        let mut obstacles = vec![
            Obstacle::fixed(1, GridPos::new(0, 0)),
            Obstacle::kinetic(2, path),
        ];

        assert!(!grid.passable(GridPos::new(0, 0), &obstacles));
        assert!(!grid.passable(GridPos::new(1, 2), &obstacles));
        assert!(grid.passable(GridPos::new(2, 2), &obstacles));

        obstacles[1].advance();
        assert!(grid.passable(GridPos::new(1, 2), &obstacles));
        assert!(!grid.passable(GridPos::new(2, 2), &obstacles));
    }

    #[test]
    fn test_step_and_manhattan() {
        let p = GridPos::new(3, 12);
        assert_eq!(p.step(Direction::Up), GridPos::new(3, 11));
        assert_eq!(p.step(Direction::Hold), p);
        assert_eq!(manhattan(p, GridPos::new(1, 11)), 3);
    }
}
