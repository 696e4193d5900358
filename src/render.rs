//! Grid to presentation-space projection
//!
//! The scene graph itself lives outside the crate; renderers receive
//! [`EntityEvent`](crate::sim::EntityEvent)s and use this to place nodes.

use glam::{IVec2, Vec2};

use crate::sim::{Grid, GridPos};

/// Maps grid cells onto a scene with a one-cell margin on every side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridProjection {
    /// Size of one cell along each axis
    pub cell_size: Vec2,
    pub scene_size: Vec2,
}

impl GridProjection {
    pub fn new(grid: Grid, scene_size: Vec2) -> Self {
        let dims = Vec2::new(grid.width as f32, grid.height as f32);
        Self {
            cell_size: scene_size / (dims + Vec2::splat(2.0)),
            scene_size,
        }
    }

    /// Center point of a cell
    #[inline]
    pub fn point(&self, cell: GridPos) -> Vec2 {
        (IVec2::from(cell).as_vec2() + Vec2::splat(1.5)) * self.cell_size
    }

    pub fn resize(&mut self, grid: Grid, scene_size: Vec2) {
        if scene_size.x > 0.0 && scene_size.y > 0.0 {
            *self = Self::new(grid, scene_size);
        }
    }
}
