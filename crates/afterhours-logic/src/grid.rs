//! Per-room boolean walkability grid.
//!
//! Built once from a room's wall and furniture rectangles and never mutated
//! afterwards. Cells are addressed `(cx, cy)` relative to the room origin;
//! out-of-range cells are simply not walkable.

use std::f32::consts::SQRT_2;

use crate::geometry::{Rect, Vec2};
use crate::topology::Room;

/// Cell coordinate inside a grid.
pub type Cell = (i32, i32);

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Walkability grid for a single room.
#[derive(Debug, Clone)]
pub struct NavGrid {
    origin: Vec2,
    cell_size: f32,
    cols: i32,
    rows: i32,
    /// Row-major, `true` = walkable.
    cells: Vec<bool>,
}

impl NavGrid {
    /// Build a grid covering `bounds`, blocking every cell that overlaps an
    /// obstacle grown by `clearance` on each side.
    ///
    /// Obstacle edges are rounded outward: floor at the leading boundary,
    /// ceil at the trailing one, so partially covered cells are blocked.
    pub fn build<'a>(
        bounds: Rect,
        obstacles: impl IntoIterator<Item = &'a Rect>,
        cell_size: f32,
        clearance: f32,
    ) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = (bounds.w / cell_size).ceil().max(0.0) as i32;
        let rows = (bounds.h / cell_size).ceil().max(0.0) as i32;
        let mut grid = Self {
            origin: Vec2::new(bounds.x, bounds.y),
            cell_size,
            cols,
            rows,
            cells: vec![true; (cols * rows) as usize],
        };

        for obstacle in obstacles {
            let r = obstacle.inflate(clearance);
            let x0 = (((r.left() - grid.origin.x) / cell_size).floor() as i32).max(0);
            let x1 = (((r.right() - grid.origin.x) / cell_size).ceil() as i32).min(cols);
            let y0 = (((r.top() - grid.origin.y) / cell_size).floor() as i32).max(0);
            let y1 = (((r.bottom() - grid.origin.y) / cell_size).ceil() as i32).min(rows);
            for cy in y0..y1 {
                for cx in x0..x1 {
                    let idx = grid.index(cx, cy);
                    grid.cells[idx] = false;
                }
            }
        }
        grid
    }

    /// Build the grid for a room from its walls and furniture.
    pub fn from_room(room: &Room, cell_size: f32, clearance: f32) -> Self {
        Self::build(room.bounds, room.obstacles(), cell_size, clearance)
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn in_bounds(&self, cx: i32, cy: i32) -> bool {
        cx >= 0 && cy >= 0 && cx < self.cols && cy < self.rows
    }

    fn index(&self, cx: i32, cy: i32) -> usize {
        (cy * self.cols + cx) as usize
    }

    /// World point to cell coordinate. May be out of bounds.
    pub fn world_to_cell(&self, p: Vec2) -> Cell {
        (
            ((p.x - self.origin.x) / self.cell_size).floor() as i32,
            ((p.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, cx: i32, cy: i32) -> Vec2 {
        Vec2::new(
            self.origin.x + (cx as f32 + 0.5) * self.cell_size,
            self.origin.y + (cy as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn cell_walkable(&self, cx: i32, cy: i32) -> bool {
        self.in_bounds(cx, cy) && self.cells[self.index(cx, cy)]
    }

    pub fn is_walkable(&self, world_x: f32, world_y: f32) -> bool {
        let (cx, cy) = self.world_to_cell(Vec2::new(world_x, world_y));
        self.cell_walkable(cx, cy)
    }

    /// Walkable neighbors with their step cost (1 orthogonal, √2 diagonal).
    ///
    /// A diagonal is offered only when both orthogonal cells it passes
    /// between are walkable, so paths never clip a wall corner.
    pub fn neighbors(&self, cx: i32, cy: i32) -> Vec<(i32, i32, f32)> {
        let mut out = Vec::with_capacity(8);
        for (dx, dy) in ORTHOGONAL {
            if self.cell_walkable(cx + dx, cy + dy) {
                out.push((cx + dx, cy + dy, 1.0));
            }
        }
        for (dx, dy) in DIAGONAL {
            if self.cell_walkable(cx + dx, cy + dy)
                && self.cell_walkable(cx + dx, cy)
                && self.cell_walkable(cx, cy + dy)
            {
                out.push((cx + dx, cy + dy, SQRT_2));
            }
        }
        out
    }

    /// Closest walkable cell (by center distance) to a world point.
    pub fn nearest_walkable(&self, p: Vec2) -> Option<Cell> {
        let (cx, cy) = self.world_to_cell(p);
        if self.cell_walkable(cx, cy) {
            return Some((cx, cy));
        }
        let mut best: Option<(f32, Cell)> = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                if !self.cells[self.index(x, y)] {
                    continue;
                }
                let d = self.cell_center(x, y).distance_squared(&p);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, (x, y)));
                }
            }
        }
        best.map(|(_, cell)| cell)
    }

    /// Center of [`Self::nearest_walkable`], or `None` for a fully blocked room.
    pub fn snap_to_walkable(&self, p: Vec2) -> Option<Vec2> {
        self.nearest_walkable(p)
            .map(|(cx, cy)| self.cell_center(cx, cy))
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
